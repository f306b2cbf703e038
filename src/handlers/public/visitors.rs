// handlers/public/visitors.rs - /api/visitors presence pings

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::models::visitor::PresenceWindows;
use crate::database::models::{VisitorPayload, VisitorPing};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/visitors - `{ sessionId, pageUrl }`
///
/// Inserts the session or refreshes its `lastSeen`/`pageUrl`.
pub async fn ping(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VisitorPayload>,
) -> ApiResult<Json<Value>> {
    let session_id = payload
        .session_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("sessionId is required"))?;

    let ping = VisitorPing {
        session_id,
        ip_address: client_ip(&headers),
        user_agent: header_value(&headers, "user-agent"),
        page_url: payload.page_url,
    };

    state.store.upsert_visitor(ping, Utc::now()).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/visitors - `{ activeVisitors }` seen in the last five minutes
pub async fn active(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let windows = PresenceWindows::ending_at(Utc::now());
    let count = state.store.count_visitors(windows.current_start, None).await?;
    Ok(Json(json!({ "activeVisitors": count })))
}

/// `x-forwarded-for` as sent (may be a list), else `x-real-ip`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for").or_else(|| header_value(headers, "x-real-ip"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7, 10.0.0.1"));
    }

    #[test]
    fn falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.2"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
