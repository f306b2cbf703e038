pub mod activity;
pub mod admin;
pub mod message;
pub mod project;
pub mod skill;
pub mod visitor;

pub use activity::{Activity, ActivityDraft, ActivityPayload};
pub use admin::{Admin, LoginPayload};
pub use message::{Message, MessageDraft, MessagePayload};
pub use project::{Project, ProjectDraft, ProjectPayload, ProjectRow, ProjectSkillRow, SkillRef};
pub use skill::{Skill, SkillDraft, SkillPayload};
pub use visitor::{Visitor, VisitorPayload, VisitorPing};

use thiserror::Error;

/// Request payload is missing one or more required, non-empty fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

/// Collects missing field names while drafts are being assembled
#[derive(Debug, Default)]
pub(crate) struct FieldCheck {
    missing: Vec<&'static str>,
}

impl FieldCheck {
    /// Returns the value when present and not blank, otherwise records `field` as missing
    pub(crate) fn required(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, MissingFields> {
        if self.missing.is_empty() {
            Ok(value)
        } else {
            Err(MissingFields(self.missing))
        }
    }
}

/// Blank optional strings are stored as NULL
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
