use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::project::assemble_projects;
use crate::database::models::{
    Activity, ActivityDraft, Admin, Message, MessageDraft, Project, ProjectDraft, ProjectRow,
    ProjectSkillRow, Skill, SkillDraft, Visitor, VisitorPing,
};
use crate::database::repository::{
    ActivityRepository, AdminRepository, MessageRepository, ProjectRepository, SkillRepository,
    Store, VisitorRepository,
};

/// In-process store with the same observable semantics as `PgStore`.
///
/// Each operation holds the lock for its whole duration, which gives the
/// multi-step project writes the same all-or-nothing visibility a
/// transaction does.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    skills: Vec<Skill>,
    projects: Vec<ProjectRow>,
    /// (project_id, skill_id)
    project_skills: Vec<(i32, i32)>,
    messages: Vec<Message>,
    visitors: Vec<Visitor>,
    activity: Vec<Activity>,
    admins: Vec<Admin>,
    next_skill_id: i32,
    next_project_id: i32,
    next_message_id: i32,
    next_visitor_id: i32,
    next_activity_id: i32,
    next_admin_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl MemoryState {
    fn projects_with_skills(&self, rows: Vec<ProjectRow>) -> Vec<Project> {
        let mut pairs: Vec<ProjectSkillRow> = self
            .project_skills
            .iter()
            .filter(|(project_id, _)| rows.iter().any(|r| r.id == *project_id))
            .filter_map(|(project_id, skill_id)| {
                self.skills
                    .iter()
                    .find(|s| s.id == *skill_id)
                    .map(|s| ProjectSkillRow {
                        project_id: *project_id,
                        skill_id: s.id,
                        skill_name: s.name.clone(),
                    })
            })
            .collect();
        pairs.sort_by_key(|p| (p.project_id, p.skill_id));
        assemble_projects(rows, pairs)
    }

    fn link_skills(&mut self, project_id: i32, skill_ids: &[i32]) {
        self.project_skills
            .extend(skill_ids.iter().map(|skill_id| (project_id, *skill_id)));
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        let state = self.state.read().await;
        let mut skills = state.skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.skills.iter().find(|s| s.id == id).cloned())
    }

    async fn create_skill(&self, draft: SkillDraft) -> Result<Skill, DatabaseError> {
        let mut state = self.state.write().await;
        let skill = draft.into_skill(next_id(&mut state.next_skill_id));
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: i32, draft: SkillDraft) -> Result<Option<Skill>, DatabaseError> {
        let mut state = self.state.write().await;
        Ok(state.skills.iter_mut().find(|s| s.id == id).map(|slot| {
            *slot = draft.into_skill(id);
            slot.clone()
        }))
    }

    async fn delete_skill(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.skills.len();
        state.skills.retain(|s| s.id != id);
        Ok(state.skills.len() < before)
    }

    async fn count_skills(&self) -> Result<i64, DatabaseError> {
        Ok(self.state.read().await.skills.len() as i64)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let state = self.state.read().await;
        let mut rows = state.projects.clone();
        rows.sort_by_key(|r| r.id);
        Ok(state.projects_with_skills(rows))
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>, DatabaseError> {
        let state = self.state.read().await;
        let rows: Vec<ProjectRow> = state.projects.iter().filter(|r| r.id == id).cloned().collect();
        Ok(state.projects_with_skills(rows).pop())
    }

    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, DatabaseError> {
        let mut state = self.state.write().await;
        let id = next_id(&mut state.next_project_id);
        let row = ProjectRow {
            id,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            github_url: draft.github_url,
            live_url: draft.live_url,
        };
        state.projects.push(row.clone());
        state.link_skills(id, &draft.skill_ids);
        state
            .projects_with_skills(vec![row])
            .pop()
            .ok_or_else(|| DatabaseError::NotFound(format!("Project {id} vanished during create")))
    }

    async fn update_project(&self, id: i32, draft: ProjectDraft) -> Result<Option<Project>, DatabaseError> {
        let mut state = self.state.write().await;
        let Some(slot) = state.projects.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        *slot = ProjectRow {
            id,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            github_url: draft.github_url,
            live_url: draft.live_url,
        };
        let row = slot.clone();

        state.project_skills.retain(|(project_id, _)| *project_id != id);
        state.link_skills(id, &draft.skill_ids);
        Ok(state.projects_with_skills(vec![row]).pop())
    }

    async fn delete_project(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        state.project_skills.retain(|(project_id, _)| *project_id != id);
        let before = state.projects.len();
        state.projects.retain(|r| r.id != id);
        Ok(state.projects.len() < before)
    }

    async fn project_skill_ids(&self, project_id: i32) -> Result<Vec<i32>, DatabaseError> {
        let state = self.state.read().await;
        let mut ids: Vec<i32> = state
            .project_skills
            .iter()
            .filter(|(p, _)| *p == project_id)
            .map(|(_, s)| *s)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn count_projects(&self) -> Result<i64, DatabaseError> {
        Ok(self.state.read().await.projects.len() as i64)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create_message(&self, draft: MessageDraft, now: DateTime<Utc>) -> Result<Message, DatabaseError> {
        let mut state = self.state.write().await;
        let message = Message {
            id: next_id(&mut state.next_message_id),
            name: draft.name,
            email: draft.email,
            message: draft.message,
            created_at: now,
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, DatabaseError> {
        let mut messages = self.state.read().await.messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }
}

#[async_trait]
impl VisitorRepository for MemoryStore {
    async fn upsert_visitor(&self, ping: VisitorPing, now: DateTime<Utc>) -> Result<Visitor, DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.visitors.iter_mut().find(|v| v.session_id == ping.session_id) {
            existing.last_seen = now;
            existing.page_url = ping.page_url;
            return Ok(existing.clone());
        }

        let visitor = Visitor {
            id: next_id(&mut state.next_visitor_id),
            session_id: ping.session_id,
            ip_address: ping.ip_address,
            user_agent: ping.user_agent,
            page_url: ping.page_url,
            last_seen: now,
        };
        state.visitors.push(visitor.clone());
        Ok(visitor)
    }

    async fn count_visitors(
        &self,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<i64, DatabaseError> {
        let state = self.state.read().await;
        // session_id is unique, so counting rows counts distinct sessions
        let count = state
            .visitors
            .iter()
            .filter(|v| v.last_seen >= since && until.map_or(true, |u| v.last_seen < u))
            .count();
        Ok(count as i64)
    }

    async fn get_visitor(&self, session_id: &str) -> Result<Option<Visitor>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.visitors.iter().find(|v| v.session_id == session_id).cloned())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn record_activity(&self, draft: ActivityDraft, now: DateTime<Utc>) -> Result<Activity, DatabaseError> {
        let mut state = self.state.write().await;
        let activity = Activity {
            id: next_id(&mut state.next_activity_id),
            kind: draft.kind,
            title: draft.title,
            user_id: draft.user_id,
            created_at: now,
        };
        state.activity.push(activity.clone());
        Ok(activity)
    }

    async fn recent_activity(&self, limit: i64) -> Result<Vec<Activity>, DatabaseError> {
        let mut entries = self.state.read().await.activity.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.admins.iter().find(|a| a.username == username).cloned())
    }

    async fn save_admin(&self, username: &str, password: &str) -> Result<Admin, DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.admins.iter_mut().find(|a| a.username == username) {
            existing.password = password.to_string();
            return Ok(existing.clone());
        }
        let admin = Admin {
            id: next_id(&mut state.next_admin_id),
            username: username.to_string(),
            password: password.to_string(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn skill(name: &str) -> SkillDraft {
        SkillDraft {
            name: name.into(),
            description: format!("{name} description"),
            icon: "SiCode".into(),
        }
    }

    fn project(title: &str, skill_ids: Vec<i32>) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            description: "desc".into(),
            image_url: None,
            github_url: None,
            live_url: None,
            skill_ids,
        }
    }

    #[tokio::test]
    async fn skills_are_listed_by_name() {
        let store = MemoryStore::new();
        store.create_skill(skill("Rust")).await.unwrap();
        store.create_skill(skill("Go")).await.unwrap();
        store.create_skill(skill("Python")).await.unwrap();

        let names: Vec<String> = store.list_skills().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Go", "Python", "Rust"]);
    }

    #[tokio::test]
    async fn deleted_skill_disappears_from_projects_but_link_remains() {
        let store = MemoryStore::new();
        let rust = store.create_skill(skill("Rust")).await.unwrap();
        let go = store.create_skill(skill("Go")).await.unwrap();
        let p = store.create_project(project("Site", vec![rust.id, go.id])).await.unwrap();

        assert!(store.delete_skill(go.id).await.unwrap());

        let fetched = store.get_project(p.id).await.unwrap().unwrap();
        assert_eq!(fetched.skills.len(), 1);
        assert_eq!(fetched.skills[0].id, rust.id);
        assert_eq!(store.project_skill_ids(p.id).await.unwrap(), vec![rust.id, go.id]);
    }

    #[tokio::test]
    async fn update_of_unknown_project_leaves_links_untouched() {
        let store = MemoryStore::new();
        let rust = store.create_skill(skill("Rust")).await.unwrap();
        let p = store.create_project(project("Site", vec![rust.id])).await.unwrap();

        let missing = store.update_project(p.id + 100, project("Ghost", vec![])).await.unwrap();
        assert!(missing.is_none());
        assert_eq!(store.project_skill_ids(p.id).await.unwrap(), vec![rust.id]);
    }

    #[tokio::test]
    async fn visitor_windows_are_half_open() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let ping = |id: &str| VisitorPing {
            session_id: id.into(),
            ip_address: None,
            user_agent: None,
            page_url: Some("/".into()),
        };

        store.upsert_visitor(ping("a"), now - Duration::minutes(1)).await.unwrap();
        store.upsert_visitor(ping("b"), now - Duration::minutes(5)).await.unwrap();
        store.upsert_visitor(ping("c"), now - Duration::minutes(7)).await.unwrap();
        store.upsert_visitor(ping("d"), now - Duration::minutes(11)).await.unwrap();

        let five = now - Duration::minutes(5);
        let ten = now - Duration::minutes(10);
        assert_eq!(store.count_visitors(five, None).await.unwrap(), 2);
        assert_eq!(store.count_visitors(ten, Some(five)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_admin_overwrites_password() {
        let store = MemoryStore::new();
        let first = store.save_admin("admin", "one").await.unwrap();
        let second = store.save_admin("admin", "two").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.find_admin("admin").await.unwrap().unwrap().password, "two");
    }
}
