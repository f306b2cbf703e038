use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{FieldCheck, MissingFields};

/// Contact form submission. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl MessagePayload {
    pub fn into_draft(self) -> Result<MessageDraft, MissingFields> {
        let mut check = FieldCheck::default();
        let name = check.required("name", self.name);
        let email = check.required("email", self.email);
        let message = check.required("message", self.message);
        check.finish(MessageDraft { name, email, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_email_is_reported() {
        let err = MessagePayload {
            name: Some("Ada".into()),
            email: None,
            message: Some("Hello".into()),
        }
        .into_draft()
        .unwrap_err();
        assert_eq!(err.0, vec!["email"]);
    }
}
