// handlers/public/auth.rs - POST /api/auth/login, POST /api/auth/logout

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::{removal_cookie, session_cookie, verify_credentials};
use crate::database::models::LoginPayload;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/**
 * POST /api/auth/login - check admin credentials and set the session cookie
 *
 * Input: `{ "username": "string", "password": "string" }`
 *
 * 200 `{ "message": "Login successful" }` with `isAdminLoggedIn` set, or
 * 401 `{ "error": "Invalid credentials" }` with no cookie.
 */
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let admin = verify_credentials(state.store.as_ref(), &username, &password).await?;
    let Some(admin) = admin else {
        tracing::warn!(username = %username, "failed admin login");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    tracing::info!(admin_id = admin.id, "admin logged in");
    Ok((
        jar.add(session_cookie(state.secure_cookie)),
        Json(json!({ "message": "Login successful" })),
    ))
}

/// POST /api/auth/logout - drop the session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.remove(removal_cookie()),
        Json(json!({ "message": "Logged out" })),
    )
}
