// handlers/admin/activity.rs - /api/admin/activity

use axum::{extract::State, Json};
use chrono::Utc;

use crate::database::models::{Activity, ActivityPayload};
use crate::error::ApiResult;
use crate::state::AppState;

/// Entries returned by the feed
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// GET /api/admin/activity - latest entries, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Activity>>> {
    Ok(Json(state.store.recent_activity(RECENT_ACTIVITY_LIMIT).await?))
}

/// POST /api/admin/activity - `{ type, title, user_id? }`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ActivityPayload>,
) -> ApiResult<Json<Activity>> {
    let draft = payload.into_draft()?;
    Ok(Json(state.store.record_activity(draft, Utc::now()).await?))
}
