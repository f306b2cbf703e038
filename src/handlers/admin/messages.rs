// handlers/admin/messages.rs - /api/admin/messages
//
// POST is the public contact form intake; GET is the admin inbox.

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::models::{Message, MessagePayload};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/admin/messages - `{ name, email, message }`, all required
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MessagePayload>,
) -> ApiResult<Json<Value>> {
    let draft = payload.into_draft().map_err(|e| {
        tracing::warn!(missing = ?e.0, "rejected contact message");
        e
    })?;

    let message = state.store.create_message(draft, Utc::now()).await?;
    tracing::info!(message_id = message.id, "contact message received");
    state.note_activity("message", format!("New message from {}", message.name)).await;

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully",
        "id": message.id
    })))
}

/// GET /api/admin/messages - newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    Ok(Json(state.store.list_messages().await?))
}
