use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{FieldCheck, MissingFields};
use crate::database::schema::DEFAULT_SKILL_ICON;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Incoming skill body; `id` is only read by the collection-level PUT/DELETE
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillPayload {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Validated values ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDraft {
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl SkillPayload {
    pub fn into_draft(self) -> Result<SkillDraft, MissingFields> {
        let mut check = FieldCheck::default();
        let name = check.required("name", self.name);
        let description = check.required("description", self.description);
        let icon = self
            .icon
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SKILL_ICON.to_string());
        check.finish(SkillDraft { name, description, icon })
    }
}

impl SkillDraft {
    pub fn into_skill(self, id: i32) -> Skill {
        Skill {
            id,
            name: self.name,
            description: self.description,
            icon: self.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_falls_back_to_default() {
        let draft = SkillPayload {
            name: Some("Rust".into()),
            description: Some("Systems language".into()),
            ..Default::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.icon, "SiCode");
    }

    #[test]
    fn explicit_icon_is_kept() {
        let draft = SkillPayload {
            name: Some("Rust".into()),
            description: Some("Systems language".into()),
            icon: Some("SiRust".into()),
            ..Default::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.icon, "SiRust");
    }

    #[test]
    fn name_and_description_are_required() {
        let err = SkillPayload::default().into_draft().unwrap_err();
        assert_eq!(err, MissingFields(vec!["name", "description"]));
    }
}
