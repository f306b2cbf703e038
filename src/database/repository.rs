//! Repository seams: one trait per entity, all implemented by each store.
//!
//! `PgStore` is the production implementation; `MemoryStore` keeps the same
//! observable behavior in-process so the router can run without PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Activity, ActivityDraft, Admin, Message, MessageDraft, Project, ProjectDraft, Skill,
    SkillDraft, Visitor, VisitorPing,
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// All skills ordered by name
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError>;

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>, DatabaseError>;

    async fn create_skill(&self, draft: SkillDraft) -> Result<Skill, DatabaseError>;

    /// `None` when no skill has this id
    async fn update_skill(&self, id: i32, draft: SkillDraft) -> Result<Option<Skill>, DatabaseError>;

    /// Unconditional; join rows pointing at the skill are left in place.
    /// Returns whether a row was removed.
    async fn delete_skill(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn count_skills(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;

    async fn get_project(&self, id: i32) -> Result<Option<Project>, DatabaseError>;

    /// Inserts the project and its skill links atomically
    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, DatabaseError>;

    /// Replaces the row and the full skill set atomically; `None` when no project has this id
    async fn update_project(&self, id: i32, draft: ProjectDraft) -> Result<Option<Project>, DatabaseError>;

    /// Removes skill links then the project, atomically
    async fn delete_project(&self, id: i32) -> Result<bool, DatabaseError>;

    /// Raw join-table skill ids for a project, including links to deleted skills
    async fn project_skill_ids(&self, project_id: i32) -> Result<Vec<i32>, DatabaseError>;

    async fn count_projects(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, draft: MessageDraft, now: DateTime<Utc>) -> Result<Message, DatabaseError>;

    /// Newest first
    async fn list_messages(&self) -> Result<Vec<Message>, DatabaseError>;
}

#[async_trait]
pub trait VisitorRepository: Send + Sync {
    /// Insert, or refresh `last_seen` and `page_url` for a known session
    async fn upsert_visitor(&self, ping: VisitorPing, now: DateTime<Utc>) -> Result<Visitor, DatabaseError>;

    /// Distinct sessions seen at or after `since`, and strictly before `until` when given
    async fn count_visitors(
        &self,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<i64, DatabaseError>;

    async fn get_visitor(&self, session_id: &str) -> Result<Option<Visitor>, DatabaseError>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn record_activity(&self, draft: ActivityDraft, now: DateTime<Utc>) -> Result<Activity, DatabaseError>;

    /// Newest first, at most `limit` entries
    async fn recent_activity(&self, limit: i64) -> Result<Vec<Activity>, DatabaseError>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError>;

    /// Create the account, or overwrite the password of an existing one
    async fn save_admin(&self, username: &str, password: &str) -> Result<Admin, DatabaseError>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait]
pub trait Store:
    SkillRepository
    + ProjectRepository
    + MessageRepository
    + VisitorRepository
    + ActivityRepository
    + AdminRepository
{
    /// Cheap connectivity probe for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Short backend name for logs and `/health`
    fn backend(&self) -> &'static str;
}
