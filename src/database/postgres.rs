use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::project::assemble_projects;
use crate::database::models::{
    Activity, ActivityDraft, Admin, Message, MessageDraft, Project, ProjectDraft, ProjectRow,
    ProjectSkillRow, Skill, SkillDraft, Visitor, VisitorPing,
};
use crate::database::repository::{
    ActivityRepository, AdminRepository, MessageRepository, ProjectRepository, SkillRepository,
    Store, VisitorRepository,
};

const PROJECT_COLUMNS: &str = "id, title, description, image_url, github_url, live_url";

/// PostgreSQL-backed store. Every call leases one pooled connection (or one
/// transaction for multi-statement writes) and returns it on drop.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(manager: &DatabaseManager) -> Self {
        Self {
            pool: manager.pool().clone(),
        }
    }

    /// Load projects (all, or the given ids) together with their skills
    async fn fetch_projects(
        conn: &mut PgConnection,
        ids: Option<&[i32]>,
    ) -> Result<Vec<Project>, DatabaseError> {
        let rows: Vec<ProjectRow> = match ids {
            Some(ids) => {
                sqlx::query_as(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ANY($1) ORDER BY id"
                ))
                .bind(ids)
                .fetch_all(&mut *conn)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"))
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let project_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let skill_rows: Vec<ProjectSkillRow> = sqlx::query_as(
            r#"
            SELECT ps.project_id, s.id AS skill_id, s.name AS skill_name
            FROM project_skills ps
            JOIN skills s ON s.id = ps.skill_id
            WHERE ps.project_id = ANY($1)
            ORDER BY ps.project_id, s.id
            "#,
        )
        .bind(&project_ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(assemble_projects(rows, skill_rows))
    }

    async fn fetch_project(conn: &mut PgConnection, id: i32) -> Result<Option<Project>, DatabaseError> {
        Ok(Self::fetch_projects(conn, Some(std::slice::from_ref(&id))).await?.pop())
    }

    /// Bulk insert of join rows in one statement
    async fn insert_project_skills(
        conn: &mut PgConnection,
        project_id: i32,
        skill_ids: &[i32],
    ) -> Result<(), DatabaseError> {
        if skill_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO project_skills (project_id, skill_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(project_id)
        .bind(skill_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SkillRepository for PgStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        let skills = sqlx::query_as("SELECT id, name, description, icon FROM skills ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(skills)
    }

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>, DatabaseError> {
        let skill = sqlx::query_as("SELECT id, name, description, icon FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(skill)
    }

    async fn create_skill(&self, draft: SkillDraft) -> Result<Skill, DatabaseError> {
        let skill: Skill = sqlx::query_as(
            "INSERT INTO skills (name, description, icon) VALUES ($1, $2, $3) RETURNING id, name, description, icon",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.icon)
        .fetch_one(&self.pool)
        .await?;
        debug!(skill_id = skill.id, "created skill");
        Ok(skill)
    }

    async fn update_skill(&self, id: i32, draft: SkillDraft) -> Result<Option<Skill>, DatabaseError> {
        let skill = sqlx::query_as(
            "UPDATE skills SET name = $1, description = $2, icon = $3 WHERE id = $4 RETURNING id, name, description, icon",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.icon)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(skill)
    }

    async fn delete_skill(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(skill_id = id, removed = result.rows_affected(), "deleted skill");
        Ok(result.rows_affected() > 0)
    }

    async fn count_skills(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_projects(&mut conn, None).await
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_project(&mut conn, id).await
    }

    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, DatabaseError> {
        // Dropping `tx` on any early return rolls the whole write back
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO projects (title, description, image_url, github_url, live_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(&draft.github_url)
        .bind(&draft.live_url)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_project_skills(&mut tx, id, &draft.skill_ids).await?;

        let project = Self::fetch_project(&mut tx, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Project {id} vanished during create")))?;

        tx.commit().await?;
        debug!(project_id = id, skills = draft.skill_ids.len(), "created project");
        Ok(project)
    }

    async fn update_project(&self, id: i32, draft: ProjectDraft) -> Result<Option<Project>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE projects
            SET title = $1, description = $2, image_url = $3, github_url = $4, live_url = $5
            WHERE id = $6
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(&draft.github_url)
        .bind(&draft.live_url)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        // Full replace of the skill set
        sqlx::query("DELETE FROM project_skills WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_project_skills(&mut tx, id, &draft.skill_ids).await?;

        let project = Self::fetch_project(&mut tx, id).await?;
        tx.commit().await?;
        debug!(project_id = id, skills = draft.skill_ids.len(), "updated project");
        Ok(project)
    }

    async fn delete_project(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_skills WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(project_id = id, removed = result.rows_affected(), "deleted project");
        Ok(result.rows_affected() > 0)
    }

    async fn project_skill_ids(&self, project_id: i32) -> Result<Vec<i32>, DatabaseError> {
        let ids: Vec<(i32,)> = sqlx::query_as(
            "SELECT skill_id FROM project_skills WHERE project_id = $1 ORDER BY skill_id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn count_projects(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn create_message(&self, draft: MessageDraft, now: DateTime<Utc>) -> Result<Message, DatabaseError> {
        let message: Message = sqlx::query_as(
            r#"
            INSERT INTO messages (name, email, message, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.message)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        debug!(message_id = message.id, "stored contact message");
        Ok(message)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, DatabaseError> {
        let messages = sqlx::query_as(
            "SELECT id, name, email, message, created_at FROM messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}

#[async_trait]
impl VisitorRepository for PgStore {
    async fn upsert_visitor(&self, ping: VisitorPing, now: DateTime<Utc>) -> Result<Visitor, DatabaseError> {
        let visitor = sqlx::query_as(
            r#"
            INSERT INTO visitors (session_id, ip_address, user_agent, page_url, last_seen)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id)
            DO UPDATE SET last_seen = EXCLUDED.last_seen, page_url = EXCLUDED.page_url
            RETURNING id, session_id, ip_address, user_agent, page_url, last_seen
            "#,
        )
        .bind(&ping.session_id)
        .bind(&ping.ip_address)
        .bind(&ping.user_agent)
        .bind(&ping.page_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(visitor)
    }

    async fn count_visitors(
        &self,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT session_id)
            FROM visitors
            WHERE last_seen >= $1
              AND ($2::timestamptz IS NULL OR last_seen < $2)
            "#,
        )
        .bind(since)
        .bind(until)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn get_visitor(&self, session_id: &str) -> Result<Option<Visitor>, DatabaseError> {
        let visitor = sqlx::query_as(
            "SELECT id, session_id, ip_address, user_agent, page_url, last_seen FROM visitors WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visitor)
    }
}

#[async_trait]
impl ActivityRepository for PgStore {
    async fn record_activity(&self, draft: ActivityDraft, now: DateTime<Utc>) -> Result<Activity, DatabaseError> {
        let activity = sqlx::query_as(
            r#"
            INSERT INTO activity (type, title, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, type, title, user_id, created_at
            "#,
        )
        .bind(&draft.kind)
        .bind(&draft.title)
        .bind(draft.user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn recent_activity(&self, limit: i64) -> Result<Vec<Activity>, DatabaseError> {
        let entries = sqlx::query_as(
            "SELECT id, type, title, user_id, created_at FROM activity ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as("SELECT id, username, password FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn save_admin(&self, username: &str, password: &str) -> Result<Admin, DatabaseError> {
        let admin = sqlx::query_as(
            r#"
            INSERT INTO admins (username, password) VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET password = EXCLUDED.password
            RETURNING id, username, password
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
