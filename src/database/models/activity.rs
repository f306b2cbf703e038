use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{FieldCheck, MissingFields};

/// Entry in the admin activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub title: String,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub kind: String,
    pub title: String,
    pub user_id: Option<i32>,
}

impl ActivityDraft {
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            user_id: None,
        }
    }
}

impl ActivityPayload {
    pub fn into_draft(self) -> Result<ActivityDraft, MissingFields> {
        let mut check = FieldCheck::default();
        let kind = check.required("type", self.kind);
        let title = check.required("title", self.title);
        check.finish(ActivityDraft {
            kind,
            title,
            user_id: self.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_serializes_kind_as_type() {
        let activity = Activity {
            id: 1,
            kind: "skill".into(),
            title: "Added Rust".into(),
            user_id: None,
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        };
        let v = serde_json::to_value(&activity).unwrap();
        assert_eq!(v["type"], "skill");
        assert!(v.get("kind").is_none());
    }
}
