use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use super::{non_blank, FieldCheck, MissingFields};

/// Project as returned by the API, with its skills resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub skills: Vec<SkillRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: i32,
    pub name: String,
}

/// Bare `projects` row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProjectRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
}

/// One `(project, skill)` pair from the join against `skills`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProjectSkillRow {
    pub project_id: i32,
    pub skill_id: i32,
    pub skill_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    /// Deduplicated, first occurrence wins
    pub skill_ids: Vec<i32>,
}

impl ProjectPayload {
    pub fn into_draft(self) -> Result<ProjectDraft, MissingFields> {
        let mut check = FieldCheck::default();
        let title = check.required("title", self.title);
        let description = check.required("description", self.description);

        let mut skill_ids = Vec::with_capacity(self.skills.len());
        for id in self.skills {
            if !skill_ids.contains(&id) {
                skill_ids.push(id);
            }
        }

        check.finish(ProjectDraft {
            title,
            description,
            image_url: non_blank(self.image_url),
            github_url: non_blank(self.github_url),
            live_url: non_blank(self.live_url),
            skill_ids,
        })
    }
}

impl Project {
    pub fn from_row(row: ProjectRow, skills: Vec<SkillRef>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            github_url: row.github_url,
            live_url: row.live_url,
            skills,
        }
    }
}

/// Group join rows by project id. Skills keep the order of the input rows.
pub fn group_project_skills(rows: Vec<ProjectSkillRow>) -> HashMap<i32, Vec<SkillRef>> {
    let mut grouped: HashMap<i32, Vec<SkillRef>> = HashMap::new();
    for row in rows {
        grouped.entry(row.project_id).or_default().push(SkillRef {
            id: row.skill_id,
            name: row.skill_name,
        });
    }
    grouped
}

/// Attach grouped skills to their project rows; projects without skills get an empty list
pub fn assemble_projects(rows: Vec<ProjectRow>, skill_rows: Vec<ProjectSkillRow>) -> Vec<Project> {
    let mut grouped = group_project_skills(skill_rows);
    rows.into_iter()
        .map(|row| {
            let skills = grouped.remove(&row.id).unwrap_or_default();
            Project::from_row(row, skills)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32) -> ProjectRow {
        ProjectRow {
            id,
            title: format!("Project {id}"),
            description: "desc".into(),
            image_url: None,
            github_url: None,
            live_url: None,
        }
    }

    fn pair(project_id: i32, skill_id: i32, name: &str) -> ProjectSkillRow {
        ProjectSkillRow {
            project_id,
            skill_id,
            skill_name: name.into(),
        }
    }

    #[test]
    fn skills_stay_paired_with_their_names() {
        let projects = assemble_projects(
            vec![row(1), row(2), row(3)],
            vec![pair(1, 4, "Rust"), pair(2, 5, "Go"), pair(1, 9, "SQL, advanced")],
        );

        assert_eq!(
            projects[0].skills,
            vec![
                SkillRef { id: 4, name: "Rust".into() },
                SkillRef { id: 9, name: "SQL, advanced".into() },
            ]
        );
        assert_eq!(projects[1].skills, vec![SkillRef { id: 5, name: "Go".into() }]);
        assert!(projects[2].skills.is_empty());
    }

    #[test]
    fn draft_dedupes_skill_ids_and_nulls_blank_urls() {
        let draft = ProjectPayload {
            title: Some("Site".into()),
            description: Some("Portfolio".into()),
            image_url: Some(String::new()),
            github_url: Some("https://github.com/me/site".into()),
            skills: vec![3, 1, 3, 2, 1],
            ..Default::default()
        }
        .into_draft()
        .unwrap();

        assert_eq!(draft.skill_ids, vec![3, 1, 2]);
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.github_url.as_deref(), Some("https://github.com/me/site"));
    }

    #[test]
    fn project_serializes_camel_case() {
        let project = Project::from_row(row(7), vec![]);
        let v = serde_json::to_value(&project).unwrap();
        assert!(v.get("imageUrl").is_some());
        assert!(v.get("image_url").is_none());
    }
}
