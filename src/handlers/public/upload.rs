// handlers/public/upload.rs - POST /api/upload

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Public URL prefix the uploads directory is served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// POST /api/upload - multipart form with a single `file` field
///
/// Writes the bytes as `<unix millis>-<name>` in the uploads directory and
/// returns `{ url }`. Content type and size are not checked beyond the
/// router's body limit.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        let filename = format!("{}-{}", Utc::now().timestamp_millis(), sanitize_filename(&original));
        tokio::fs::create_dir_all(&state.uploads_dir).await?;
        tokio::fs::write(state.uploads_dir.join(&filename), &bytes).await?;

        tracing::info!(file = %filename, size = bytes.len(), "stored upload");
        return Ok(Json(json!({ "url": format!("{UPLOADS_URL_PREFIX}/{filename}") })));
    }

    Err(ApiError::bad_request("No file uploaded"))
}

/// Last path component of a client-supplied name, limited to `[A-Za-z0-9._-]`
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
