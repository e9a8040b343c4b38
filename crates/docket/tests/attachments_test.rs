//! integration tests for the attached-document lifecycle: one file per
//! record, replacement supersedes, deletion removes both row and file

mod common;

use axum::http::StatusCode;
use common::{body_json, file_count, login, send_json, send_multipart, test_app, ADMIN};

const PDF_A: &[u8] = b"%PDF-1.4 first";
const PDF_B: &[u8] = b"%PDF-1.4 second replacement";

/// test that replacing an attachment leaves exactly one file under the
/// root referenced by the record, and the old file is gone
#[tokio::test]
async fn test_replace_attachment_supersedes_old_file() {
    let (app, _db, uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/proceedings",
        Some(admin.as_str()),
        &[("title", "Minutes 1")],
        Some(("minutes.pdf", "application/pdf", PDF_A)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let proceeding = body_json(response).await;
    let id = proceeding["id"].as_u64().unwrap();
    let old_path = proceeding["document_path"].as_str().unwrap().to_string();
    assert!(uploads.path().join(&old_path).exists());

    let response = send_multipart(
        &app,
        "PUT",
        &format!("/api/proceedings/{}", id),
        Some(admin.as_str()),
        &[],
        Some(("minutes-v2.pdf", "application/pdf", PDF_B)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    let new_path = updated["document_path"].as_str().unwrap().to_string();

    assert_ne!(old_path, new_path);
    assert!(!uploads.path().join(&old_path).exists(), "old file removed");
    assert!(uploads.path().join(&new_path).exists(), "new file present");
    assert_eq!(
        file_count(&uploads.path().join("proceeding")),
        1,
        "exactly one file under the category directory"
    );
}

/// test that deleting a record removes both the row and the file
#[tokio::test]
async fn test_delete_removes_row_and_file() {
    let (app, _db, uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/assets",
        Some(admin.as_str()),
        &[("title", "Laptop"), ("category", "movable")],
        Some(("evidence.pdf", "application/pdf", PDF_A)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let asset = body_json(response).await;
    let id = asset["id"].as_u64().unwrap();
    let path = asset["document_path"].as_str().unwrap().to_string();
    assert!(uploads.path().join(&path).exists());

    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/assets/{}", id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // row gone
    let response = send_json(
        &app,
        "GET",
        &format!("/api/assets/{}", id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // file gone
    assert!(!uploads.path().join(&path).exists());
}

/// test that non-pdf uploads are rejected before anything is stored
#[tokio::test]
async fn test_non_pdf_upload_rejected() {
    let (app, _db, uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[("title", "Sprindik-B")],
        Some(("notes.txt", "text/plain", b"just text")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // neither a file nor a row was written
    assert_eq!(file_count(&uploads.path().join("investigation-order")), 0);
    let response = send_json(&app, "GET", "/api/orders", Some(admin.as_str()), None).await;
    let list = body_json(response).await;
    assert!(list["orders"].as_array().unwrap().is_empty());
}

/// test that oversized uploads are rejected with a distinct status
#[tokio::test]
async fn test_oversized_upload_rejected() {
    let (app, _db, uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    // just over the 10 MiB bound
    let big = vec![0u8; 10 * 1024 * 1024 + 1];
    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[("title", "Sprindik-C")],
        Some(("big.pdf", "application/pdf", &big)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    assert_eq!(file_count(&uploads.path().join("investigation-order")), 0);
}

/// test that a record created without a file has no document fields
#[tokio::test]
async fn test_record_without_attachment() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[("title", "Paperless")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    assert!(order["document_path"].is_null());
    assert!(order["document_url"].is_null());
}
