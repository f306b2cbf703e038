// handlers/mod.rs - JSON API handlers
//
// public: /api/auth/*, /api/visitors, /api/upload
// admin:  /api/admin/*
// HTML pages live in crate::pages.

pub mod admin;
pub mod public;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health - store connectivity probe
///
/// 200 `{ status, timestamp, database }`, or 503 with the usual error body
/// when the store cannot be reached.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": state.store.backend()
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            ApiError::service_unavailable(format!("database unavailable: {e}")).into_response()
        }
    }
}
