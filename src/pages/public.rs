use axum::{extract::State, response::Html};

use super::{escape_html, layout};
use crate::database::models::{Project, Skill};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET / - skills and projects
pub async fn home(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let skills = state.store.list_skills().await?;
    let projects = state.store.list_projects().await?;

    let body = format!(
        "<h1>Portfolio</h1>\n<section id=\"skills\">\n<h2>Skills</h2>\n{}\n</section>\n<section id=\"projects\">\n<h2>Projects</h2>\n{}\n</section>\n{}",
        skill_list(&skills),
        project_cards(&projects),
        contact_form(),
    );
    Ok(Html(layout("Portfolio", &body, false)))
}

/// GET /projects
pub async fn projects(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let projects = state.store.list_projects().await?;
    let body = format!("<h1>Projects</h1>\n{}", project_cards(&projects));
    Ok(Html(layout("Projects", &body, false)))
}

fn skill_list(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "<p>No skills yet.</p>".to_string();
    }
    let items: String = skills
        .iter()
        .map(|s| {
            format!(
                "<li data-icon=\"{}\"><strong>{}</strong> {}</li>\n",
                escape_html(&s.icon),
                escape_html(&s.name),
                escape_html(&s.description)
            )
        })
        .collect();
    format!("<ul>\n{items}</ul>")
}

pub(crate) fn project_cards(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "<p>No projects yet.</p>".to_string();
    }
    projects.iter().map(project_card).collect()
}

fn project_card(p: &Project) -> String {
    let mut html = format!("<article class=\"project\">\n<h3>{}</h3>\n", escape_html(&p.title));
    if let Some(image) = &p.image_url {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape_html(image),
            escape_html(&p.title)
        ));
    }
    html.push_str(&format!("<p>{}</p>\n", escape_html(&p.description)));
    if !p.skills.is_empty() {
        let tags: Vec<String> = p
            .skills
            .iter()
            .map(|s| format!("<span class=\"tag\">{}</span>", escape_html(&s.name)))
            .collect();
        html.push_str(&format!("<p>{}</p>\n", tags.join(" ")));
    }
    if let Some(github) = &p.github_url {
        html.push_str(&format!("<a href=\"{}\">Code</a>\n", escape_html(github)));
    }
    if let Some(live) = &p.live_url {
        html.push_str(&format!("<a href=\"{}\">Live</a>\n", escape_html(live)));
    }
    html.push_str("</article>\n");
    html
}

fn contact_form() -> &'static str {
    r#"<section id="contact">
<h2>Contact</h2>
<form data-action="/api/admin/messages" data-method="POST">
<input name="name" placeholder="Name" required>
<input name="email" type="email" placeholder="Email" required>
<textarea name="message" placeholder="Message" required></textarea>
<button>Send</button>
<p class="error"></p>
</form>
</section>"#
}
