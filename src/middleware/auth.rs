use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::SESSION_COOKIE;

/// Login page, the one admin path reachable without the session cookie
pub const LOGIN_PATH: &str = "/admin/login";

/// Admin page gate.
///
/// Any `/admin` path other than the login page needs the session cookie. The
/// cookie's value is not inspected. Without it the browser is sent to the
/// login page with the requested path as `callbackUrl`.
pub async fn admin_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if requires_session(path) && jar.get(SESSION_COOKIE).is_none() {
        tracing::debug!(path, "redirecting unauthenticated admin request");
        return Redirect::temporary(&login_redirect(path)).into_response();
    }

    next.run(request).await
}

/// Whether `path` is an admin page behind the gate
pub fn requires_session(path: &str) -> bool {
    let is_admin = path == "/admin" || path.starts_with("/admin/");
    is_admin && path != LOGIN_PATH
}

/// `/admin/login?callbackUrl=<path>` with the path form-encoded
pub fn login_redirect(path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", path)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}
