use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::config::AppConfig;
use crate::database::models::ActivityDraft;
use crate::database::repository::Store;

/// Shared router state: the injected store plus the few settings handlers read
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub uploads_dir: PathBuf,
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        Self {
            store,
            uploads_dir: config.server.uploads_dir.clone(),
            secure_cookie: config.security.secure_cookie,
        }
    }

    /// Best-effort entry in the activity feed; failures are logged and dropped
    pub async fn note_activity(&self, kind: &str, title: String) {
        if let Err(e) = self
            .store
            .record_activity(ActivityDraft::new(kind, title), Utc::now())
            .await
        {
            tracing::warn!(kind, error = %e, "failed to record activity");
        }
    }
}
