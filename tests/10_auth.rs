mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::{body_json, TestApp, ADMIN_PASSWORD, ADMIN_USER, SESSION};

#[tokio::test]
async fn health_reports_memory_backend() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/health").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn login_sets_session_cookie() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app
        .json(
            Method::POST,
            "/api/auth/login",
            json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("isAdminLoggedIn=true"), "{cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));

    let body = body_json(res).await?;
    assert_eq!(body["message"], "Login successful");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected_without_cookie() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app
        .json(
            Method::POST,
            "/api/auth/login",
            json!({ "username": ADMIN_USER, "password": "nope" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());

    let body = body_json(res).await?;
    assert_eq!(body["error"], "Invalid credentials");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn unknown_user_and_empty_body_are_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app
        .json(Method::POST, "/api/auth/login", json!({ "username": "ghost", "password": "x" }))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.json(Method::POST, "/api/auth/login", json!({})).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_expires_cookie() -> Result<()> {
    let app = TestApp::new().await?;

    let request = Request::post("/api/auth/logout")
        .header(header::COOKIE, SESSION)
        .body(Body::empty())?;
    let res = app.send(request).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("isAdminLoggedIn="), "{cookie}");
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_store() -> Result<()> {
    let app = TestApp::failing().await?;

    let res = app.get("/health").await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(res).await?;
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}
