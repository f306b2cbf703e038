#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use portfolio_api::database::models::{
    Activity, ActivityDraft, Admin, Message, MessageDraft, Project, ProjectDraft, Skill,
    SkillDraft, Visitor, VisitorPing,
};
use portfolio_api::database::{
    ActivityRepository, AdminRepository, DatabaseError, MemoryStore, MessageRepository,
    ProjectRepository, SkillRepository, Store, VisitorRepository,
};
use portfolio_api::router::{app, RouterOptions};
use portfolio_api::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret";

/// Cookie header that passes the admin page gate
pub const SESSION: &str = "isAdminLoggedIn=true";

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Router over a fresh in-memory store with one admin account
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub uploads_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        Self::build(store.clone(), store).await
    }

    /// Router over a store whose skill counts, visitor counts and project
    /// writes fail; `store` still exposes the healthy data underneath
    pub async fn failing() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let failing = Arc::new(FailingStore {
            inner: store.clone(),
        });
        Self::build(failing, store).await
    }

    async fn build(served: Arc<dyn Store>, store: Arc<MemoryStore>) -> Result<Self> {
        store.save_admin(ADMIN_USER, ADMIN_PASSWORD).await?;

        let uploads_dir = std::env::temp_dir().join(format!(
            "portfolio-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));

        let state = AppState {
            store: served,
            uploads_dir: uploads_dir.clone(),
            secure_cookie: false,
        };
        let router = app(state, RouterOptions::default());

        Ok(Self {
            router,
            store,
            uploads_dir,
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get(&self, uri: &str) -> Result<Response<Body>> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> Result<Response<Body>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    /// Send and decode, asserting the expected status
    pub async fn json_ok(&self, method: Method, uri: &str, body: Value) -> Result<Value> {
        let res = self.json(method, uri, body).await?;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        body_json(res).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.uploads_dir);
    }
}

pub async fn body_json(res: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_text(res: Response<Body>) -> Result<String> {
    let bytes = to_bytes(res.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Error every failing operation returns
pub fn unavailable() -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// Delegates to a `MemoryStore` except for the operations that always fail
pub struct FailingStore {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl SkillRepository for FailingStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        self.inner.list_skills().await
    }

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>, DatabaseError> {
        self.inner.get_skill(id).await
    }

    async fn create_skill(&self, draft: SkillDraft) -> Result<Skill, DatabaseError> {
        self.inner.create_skill(draft).await
    }

    async fn update_skill(&self, id: i32, draft: SkillDraft) -> Result<Option<Skill>, DatabaseError> {
        self.inner.update_skill(id, draft).await
    }

    async fn delete_skill(&self, id: i32) -> Result<bool, DatabaseError> {
        self.inner.delete_skill(id).await
    }

    async fn count_skills(&self) -> Result<i64, DatabaseError> {
        Err(unavailable())
    }
}

#[async_trait]
impl ProjectRepository for FailingStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        self.inner.list_projects().await
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>, DatabaseError> {
        self.inner.get_project(id).await
    }

    async fn create_project(&self, _draft: ProjectDraft) -> Result<Project, DatabaseError> {
        Err(unavailable())
    }

    async fn update_project(&self, _id: i32, _draft: ProjectDraft) -> Result<Option<Project>, DatabaseError> {
        Err(unavailable())
    }

    async fn delete_project(&self, id: i32) -> Result<bool, DatabaseError> {
        self.inner.delete_project(id).await
    }

    async fn project_skill_ids(&self, project_id: i32) -> Result<Vec<i32>, DatabaseError> {
        self.inner.project_skill_ids(project_id).await
    }

    async fn count_projects(&self) -> Result<i64, DatabaseError> {
        self.inner.count_projects().await
    }
}

#[async_trait]
impl MessageRepository for FailingStore {
    async fn create_message(&self, draft: MessageDraft, now: DateTime<Utc>) -> Result<Message, DatabaseError> {
        self.inner.create_message(draft, now).await
    }

    async fn list_messages(&self) -> Result<Vec<Message>, DatabaseError> {
        self.inner.list_messages().await
    }
}

#[async_trait]
impl VisitorRepository for FailingStore {
    async fn upsert_visitor(&self, ping: VisitorPing, now: DateTime<Utc>) -> Result<Visitor, DatabaseError> {
        self.inner.upsert_visitor(ping, now).await
    }

    async fn count_visitors(
        &self,
        _since: DateTime<Utc>,
        _until: Option<DateTime<Utc>>,
    ) -> Result<i64, DatabaseError> {
        Err(unavailable())
    }

    async fn get_visitor(&self, session_id: &str) -> Result<Option<Visitor>, DatabaseError> {
        self.inner.get_visitor(session_id).await
    }
}

#[async_trait]
impl ActivityRepository for FailingStore {
    async fn record_activity(&self, draft: ActivityDraft, now: DateTime<Utc>) -> Result<Activity, DatabaseError> {
        self.inner.record_activity(draft, now).await
    }

    async fn recent_activity(&self, limit: i64) -> Result<Vec<Activity>, DatabaseError> {
        self.inner.recent_activity(limit).await
    }
}

#[async_trait]
impl AdminRepository for FailingStore {
    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        self.inner.find_admin(username).await
    }

    async fn save_admin(&self, username: &str, password: &str) -> Result<Admin, DatabaseError> {
        self.inner.save_admin(username, password).await
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(unavailable())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
