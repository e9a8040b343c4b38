//! shared helpers for handler integration tests
//!
//! functions here may be used by different test files, so dead_code
//! warnings are expected (each test file is compiled separately)

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use docket::create_app;
use docket::service::users as users_service;
use docket_db::DocketDb;
use docket_types::{Config, Role};
use tower::ServiceExt;

/// multipart boundary used by [`multipart_form`].
pub const BOUNDARY: &str = "docket-test-boundary";

/// admin credentials seeded into every test app.
pub const ADMIN: (&str, &str) = ("admin", "admin-pass");
/// viewer credentials seeded into every test app.
pub const VIEWER: (&str, &str) = ("viewer", "viewer-pass");

/// build a test app over an in-memory database and a temp attachment
/// root, seeded with one administrator and one viewer.
pub async fn test_app() -> (Router, DocketDb, tempfile::TempDir) {
    let db = DocketDb::new_in_memory()
        .await
        .expect("failed to create in-memory database");

    let uploads = tempfile::tempdir().expect("failed to create temp upload dir");
    let mut config = Config::default();
    config.uploads.path = uploads.path().to_path_buf();

    users_service::create_user(
        &db,
        users_service::CreateUser {
            username: ADMIN.0.to_string(),
            password: ADMIN.1.to_string(),
            role: Some(Role::Administrator),
        },
    )
    .await
    .expect("failed to seed admin");

    users_service::create_user(
        &db,
        users_service::CreateUser {
            username: VIEWER.0.to_string(),
            password: VIEWER.1.to_string(),
            role: Some(Role::Viewer),
        },
    )
    .await
    .expect("failed to seed viewer");

    let app = create_app(db.clone(), config)
        .await
        .expect("failed to create app");
    (app, db, uploads)
}

/// log in and return the session cookie (`docket_session=<token>`).
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let request = Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build login request");

    let response = app.clone().oneshot(request).await.expect("login failed");
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .expect("cookie should be valid ascii");
    set_cookie
        .split(';')
        .next()
        .expect("cookie should have a value")
        .to_string()
}

/// send a json request with an optional session cookie.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    app.clone().oneshot(request).await.expect("request failed")
}

/// send a multipart request with an optional session cookie.
pub async fn send_multipart(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Response<Body> {
    let body = multipart_form(fields, file);
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder
        .body(Body::from(body))
        .expect("failed to build request");

    app.clone().oneshot(request).await.expect("request failed")
}

/// build a multipart/form-data body with text fields and an optional
/// `document` file part (filename, content type, bytes).
pub fn multipart_form(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// parse a response body as json.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body should be valid json")
}

/// count the regular files under a directory.
pub fn file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
