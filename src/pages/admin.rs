use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use serde::Deserialize;

use super::{escape_html, layout};
use crate::database::models::{Activity, Message, Project, Skill};
use crate::error::ApiResult;
use crate::handlers::admin::activity::RECENT_ACTIVITY_LIMIT;
use crate::handlers::admin::dashboard::collect_stats;
use crate::state::AppState;

const DEFAULT_CALLBACK: &str = "/admin/dashboard";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    pub callback_url: Option<String>,
}

/// GET /admin
pub async fn index() -> Redirect {
    Redirect::temporary(DEFAULT_CALLBACK)
}

/// GET /admin/login
pub async fn login(Query(query): Query<LoginQuery>) -> Html<String> {
    let target = safe_callback(query.callback_url.as_deref());
    let body = format!(
        r#"<h1>Admin Login</h1>
<form data-action="/api/auth/login" data-method="POST" data-redirect="{}">
<input name="username" placeholder="Username" autocomplete="username" required>
<input name="password" type="password" placeholder="Password" autocomplete="current-password" required>
<button>Sign in</button>
<p class="error"></p>
</form>"#,
        escape_html(target)
    );
    Html(layout("Admin Login", &body, false))
}

/// Only same-site absolute paths are followed after login. Browsers read `\`
/// as `/`, so any backslash is rejected along with `//` prefixes.
fn safe_callback(callback: Option<&str>) -> &str {
    match callback {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => DEFAULT_CALLBACK,
    }
}

/// GET /admin/dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let stats = collect_stats(state.store.as_ref(), Utc::now()).await;
    let activity = state.store.recent_activity(RECENT_ACTIVITY_LIMIT).await?;

    let body = format!(
        r#"<h1>Dashboard</h1>
<section class="stats">
<div class="stat"><h3>Skills</h3><span>{}</span></div>
<div class="stat"><h3>Projects</h3><span>{}</span></div>
<div class="stat"><h3>Live visitors</h3><span>{}</span> <small>{} previous, {}</small></div>
</section>
<section>
<h2>Recent activity</h2>
{}
</section>"#,
        stats.skills.total,
        stats.projects.total,
        stats.visitors.total,
        stats.visitors.previous,
        escape_html(&stats.visitors.percentage),
        activity_list(&activity),
    );
    Ok(Html(layout("Dashboard", &body, true)))
}

fn activity_list(entries: &[Activity]) -> String {
    if entries.is_empty() {
        return "<p>No activity yet.</p>".to_string();
    }
    let items: String = entries
        .iter()
        .map(|a| {
            format!(
                "<li><em>{}</em> {} <time>{}</time></li>\n",
                escape_html(&a.kind),
                escape_html(&a.title),
                a.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect();
    format!("<ul>\n{items}</ul>")
}

/// GET /admin/skills
pub async fn skills(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let skills = state.store.list_skills().await?;
    let body = format!(
        r#"<h1>Skills</h1>
<form data-action="/api/admin/skills" data-method="POST">
<input name="name" placeholder="Name" required>
<input name="description" placeholder="Description" required>
<input name="icon" placeholder="Icon (SiCode)">
<button>Add skill</button>
<p class="error"></p>
</form>
{}"#,
        skill_table(&skills)
    );
    Ok(Html(layout("Skills", &body, true)))
}

fn skill_table(skills: &[Skill]) -> String {
    let rows: String = skills
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}{}</td></tr>\n",
                escape_html(&s.name),
                escape_html(&s.description),
                escape_html(&s.icon),
                skill_edit_form(s),
                delete_button(&format!("/api/admin/skills/{}", s.id)),
            )
        })
        .collect();
    format!("<table>\n<tr><th>Name</th><th>Description</th><th>Icon</th><th></th></tr>\n{rows}</table>")
}

/// Pre-filled PUT form for one skill
fn skill_edit_form(skill: &Skill) -> String {
    format!(
        r#"<details><summary>Edit</summary>
<form data-action="/api/admin/skills/{}" data-method="PUT">
<input name="name" value="{}" required>
<input name="description" value="{}" required>
<input name="icon" value="{}">
<button>Save</button>
<p class="error"></p>
</form>
</details>"#,
        skill.id,
        escape_html(&skill.name),
        escape_html(&skill.description),
        escape_html(&skill.icon),
    )
}

/// GET /admin/projects
pub async fn projects(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let projects = state.store.list_projects().await?;
    let skills = state.store.list_skills().await?;

    let choices = skill_checkboxes(&skills, &[]);

    let body = format!(
        r#"<h1>Projects</h1>
<form data-action="/api/admin/projects" data-method="POST" data-list="skills">
<input name="title" placeholder="Title" required>
<textarea name="description" placeholder="Description" required></textarea>
<input name="imageUrl" placeholder="Image URL">
<input type="file" id="image-upload">
<input name="githubUrl" placeholder="GitHub URL">
<input name="liveUrl" placeholder="Live URL">
<fieldset><legend>Skills</legend>
{choices}</fieldset>
<button>Add project</button>
<p class="error"></p>
</form>
<script>
document.getElementById("image-upload").addEventListener("change", function (event) {{
  var file = event.target.files[0];
  if (!file) return;
  var data = new FormData();
  data.append("file", file);
  fetch("/api/upload", {{ method: "POST", body: data }})
    .then(function (res) {{ return res.json(); }})
    .then(function (json) {{ if (json.url) document.querySelector("input[name=imageUrl]").value = json.url; }});
}});
</script>
{}"#,
        project_table(&projects, &skills)
    );
    Ok(Html(layout("Projects", &body, true)))
}

/// One checkbox per skill, ticked when its id is in `selected`
fn skill_checkboxes(skills: &[Skill], selected: &[i32]) -> String {
    skills
        .iter()
        .map(|s| {
            let checked = if selected.contains(&s.id) { " checked" } else { "" };
            format!(
                "<label><input type=\"checkbox\" name=\"skills\" value=\"{}\"{checked}> {}</label>\n",
                s.id,
                escape_html(&s.name)
            )
        })
        .collect()
}

fn project_table(projects: &[Project], skills: &[Skill]) -> String {
    let rows: String = projects
        .iter()
        .map(|p| {
            let names: Vec<String> = p.skills.iter().map(|s| escape_html(&s.name)).collect();
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}{}</td></tr>\n",
                escape_html(&p.title),
                escape_html(&p.description),
                names.join(", "),
                project_edit_form(p, skills),
                delete_button(&format!("/api/admin/projects/{}", p.id)),
            )
        })
        .collect();
    format!("<table>\n<tr><th>Title</th><th>Description</th><th>Skills</th><th></th></tr>\n{rows}</table>")
}

/// Pre-filled PUT form for one project; its current skills start ticked
fn project_edit_form(project: &Project, skills: &[Skill]) -> String {
    let selected: Vec<i32> = project.skills.iter().map(|s| s.id).collect();
    let optional = |v: &Option<String>| v.as_deref().map(escape_html).unwrap_or_default();
    format!(
        r#"<details><summary>Edit</summary>
<form data-action="/api/admin/projects/{}" data-method="PUT" data-list="skills">
<input name="title" value="{}" required>
<textarea name="description" required>{}</textarea>
<input name="imageUrl" value="{}" placeholder="Image URL">
<input name="githubUrl" value="{}" placeholder="GitHub URL">
<input name="liveUrl" value="{}" placeholder="Live URL">
<fieldset><legend>Skills</legend>
{}</fieldset>
<button>Save</button>
<p class="error"></p>
</form>
</details>"#,
        project.id,
        escape_html(&project.title),
        escape_html(&project.description),
        optional(&project.image_url),
        optional(&project.github_url),
        optional(&project.live_url),
        skill_checkboxes(skills, &selected),
    )
}

/// GET /admin/messages
pub async fn messages(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let messages = state.store.list_messages().await?;
    let body = format!("<h1>Messages</h1>\n{}", message_table(&messages));
    Ok(Html(layout("Messages", &body, true)))
}

fn message_table(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "<p>No messages yet.</p>".to_string();
    }
    let rows: String = messages
        .iter()
        .map(|m| {
            format!(
                "<tr><td>{}</td><td><a href=\"mailto:{}\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&m.name),
                escape_html(&m.email),
                escape_html(&m.email),
                escape_html(&m.message),
                m.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();
    format!("<table>\n<tr><th>Name</th><th>Email</th><th>Message</th><th>Received</th></tr>\n{rows}</table>")
}

fn delete_button(action: &str) -> String {
    format!(
        "<form data-action=\"{}\" data-method=\"DELETE\"><button>Delete</button></form>",
        escape_html(action)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_must_be_a_local_path() {
        assert_eq!(safe_callback(Some("/admin/skills")), "/admin/skills");
        assert_eq!(safe_callback(Some("https://evil.example")), DEFAULT_CALLBACK);
        assert_eq!(safe_callback(Some("//evil.example")), DEFAULT_CALLBACK);
        assert_eq!(safe_callback(Some("/\\evil.example")), DEFAULT_CALLBACK);
        assert_eq!(safe_callback(Some("/admin\\..\\x")), DEFAULT_CALLBACK);
        assert_eq!(safe_callback(None), DEFAULT_CALLBACK);
    }

    #[test]
    fn project_edit_form_ticks_current_skills() {
        use crate::database::models::SkillRef;

        let skill = |id: i32, name: &str| Skill {
            id,
            name: name.into(),
            description: String::new(),
            icon: "SiCode".into(),
        };
        let project = Project {
            id: 4,
            title: "Site \"v2\"".into(),
            description: "desc".into(),
            image_url: None,
            github_url: Some("https://github.com/me/site".into()),
            live_url: None,
            skills: vec![SkillRef { id: 2, name: "SQL".into() }],
        };

        let html = project_edit_form(&project, &[skill(1, "Rust"), skill(2, "SQL")]);
        assert!(html.contains(r#"data-action="/api/admin/projects/4" data-method="PUT""#));
        assert!(html.contains(r#"value="Site &quot;v2&quot;""#));
        assert!(html.contains(r#"value="https://github.com/me/site""#));
        assert!(html.contains(r#"value="2" checked>"#));
        assert!(html.contains(r#"value="1">"#));
    }

    #[test]
    fn empty_message_table() {
        assert_eq!(message_table(&[]), "<p>No messages yet.</p>");
    }
}
