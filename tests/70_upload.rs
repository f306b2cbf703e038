mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

use common::{body_json, body_text, TestApp};

const BOUNDARY: &str = "portfolio-test-boundary";

fn multipart(field: &str, filename: &str, content: &str) -> Result<Request<Body>> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    );
    Ok(Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))?)
}

#[tokio::test]
async fn upload_is_stored_and_served() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.send(multipart("file", "../notes.txt", "hello")?).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await?;
    let url = body["url"].as_str().unwrap_or_default().to_string();
    assert!(url.starts_with("/uploads/"), "{url}");
    assert!(url.ends_with("-notes.txt"), "{url}");

    let name = url.trim_start_matches("/uploads/");
    let stored = std::fs::read_to_string(app.uploads_dir.join(name))?;
    assert_eq!(stored, "hello");

    let res = app.get(&url).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await?, "hello");
    Ok(())
}

#[tokio::test]
async fn missing_file_field_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.send(multipart("other", "a.txt", "x")?).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await?;
    assert_eq!(body["error"], "No file uploaded");
    Ok(())
}
