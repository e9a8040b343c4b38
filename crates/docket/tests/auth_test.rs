//! integration tests for session authentication and role enforcement

mod common;

use axum::http::StatusCode;
use common::{body_json, login, send_json, send_multipart, test_app, ADMIN, VIEWER};

/// test that login with bad credentials is rejected without revealing
/// whether the username exists
#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _db, _uploads) = test_app().await;

    let wrong_password = send_json(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(serde_json::json!({ "username": ADMIN.0, "password": "wrong" })),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_user = send_json(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(serde_json::json!({ "username": "nobody", "password": "wrong" })),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    // identical messages: no username enumeration
    let body_a = axum::body::to_bytes(wrong_password.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_b = axum::body::to_bytes(unknown_user.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body_a, body_b);
}

/// test that gated endpoints reject requests without a session
#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let (app, _db, _uploads) = test_app().await;

    let response = send_json(&app, "GET", "/api/reports", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // a made-up token is just as unauthenticated
    let response = send_json(
        &app,
        "GET",
        "/api/reports",
        Some("docket_session=deadbeef"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// test that logout invalidates the session server-side
#[tokio::test]
async fn test_logout_invalidates_session() {
    let (app, _db, _uploads) = test_app().await;
    let cookie = login(&app, ADMIN.0, ADMIN.1).await;

    // session works
    let response = send_json(&app, "GET", "/api/reports", Some(cookie.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(&app, "POST", "/api/users/logout", Some(cookie.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // the old token no longer authenticates
    let response = send_json(&app, "GET", "/api/reports", Some(cookie.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// test that the profile endpoint reflects the session user
#[tokio::test]
async fn test_profile() {
    let (app, _db, _uploads) = test_app().await;
    let cookie = login(&app, VIEWER.0, VIEWER.1).await;

    let response = send_json(&app, "GET", "/api/users/profile", Some(cookie.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "viewer");
    assert_eq!(body["role"], "viewer");
}

/// test that a viewer can read every record type but mutate none
#[tokio::test]
async fn test_viewer_can_read_but_not_mutate() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;
    let viewer = login(&app, VIEWER.0, VIEWER.1).await;

    // admin creates a report
    let response = send_json(
        &app,
        "POST",
        "/api/reports",
        Some(admin.as_str()),
        Some(serde_json::json!({ "name": "LP-100" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await;
    let report_id = report["id"].as_u64().unwrap();

    // viewer reads succeed
    for uri in [
        "/api/reports",
        "/api/orders",
        "/api/proceedings",
        "/api/assets",
    ] {
        let response = send_json(&app, "GET", uri, Some(viewer.as_str()), None).await;
        assert_eq!(response.status(), StatusCode::OK, "viewer GET {}", uri);
    }

    // viewer mutations are forbidden
    let response = send_json(
        &app,
        "POST",
        "/api/reports",
        Some(viewer.as_str()),
        Some(serde_json::json!({ "name": "LP-101" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(viewer.as_str()),
        &[("title", "Nope")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/reports/{}", report_id),
        Some(viewer.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // the report survived the forbidden delete
    let response = send_json(
        &app,
        "GET",
        &format!("/api/reports/{}", report_id),
        Some(viewer.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// test that a viewer attempting to delete an asset is refused and the
/// asset survives
#[tokio::test]
async fn test_viewer_delete_asset_forbidden() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;
    let viewer = login(&app, VIEWER.0, VIEWER.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/assets",
        Some(admin.as_str()),
        &[("title", "Laptop"), ("category", "movable")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let asset = body_json(response).await;
    let asset_id = asset["id"].as_u64().unwrap();

    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/assets/{}", asset_id),
        Some(viewer.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_json(
        &app,
        "GET",
        &format!("/api/assets/{}", asset_id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// test that user management is administrator-only
#[tokio::test]
async fn test_user_management_admin_only() {
    let (app, _db, _uploads) = test_app().await;
    let viewer = login(&app, VIEWER.0, VIEWER.1).await;

    let response = send_json(&app, "GET", "/api/users", Some(viewer.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_json(
        &app,
        "POST",
        "/api/users/register",
        Some(viewer.as_str()),
        Some(serde_json::json!({ "username": "mallory", "password": "pw" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// test register/duplicate-username handling
#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_json(
        &app,
        "POST",
        "/api/users/register",
        Some(admin.as_str()),
        Some(serde_json::json!({ "username": "sari", "password": "pw", "role": "viewer" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(
        &app,
        "POST",
        "/api/users/register",
        Some(admin.as_str()),
        Some(serde_json::json!({ "username": "sari", "password": "other" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
