//! integration tests for the record hierarchy: parent checks, partial
//! updates and the end-to-end walkthroughs

mod common;

use axum::http::StatusCode;
use common::{body_json, login, send_json, send_multipart, test_app, ADMIN};

const PDF: &[u8] = b"%PDF-1.4 test document";

/// end-to-end scenario: create a report, attach an order with a pdf,
/// list the order through its parent
#[tokio::test]
async fn test_create_report_then_order_with_pdf() {
    let (app, _db, uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    // create the root report
    let response = send_json(
        &app,
        "POST",
        "/api/reports",
        Some(admin.as_str()),
        Some(serde_json::json!({ "name": "LP-001" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await;
    let report_id = report["id"].as_u64().unwrap();
    assert_eq!(report["name"], "LP-001");

    // create an order under it, with a pdf
    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[
            ("title", "Sprindik-A"),
            ("report_id", &report_id.to_string()),
        ],
        Some(("warrant.pdf", "application/pdf", PDF)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    let order_id = order["id"].as_u64().unwrap();

    // the stored path lives under the investigation-order subdirectory
    let document_path = order["document_path"].as_str().unwrap();
    assert!(document_path.starts_with("investigation-order/"));
    assert!(uploads.path().join(document_path).exists());

    // the absolute url is derived from the stored relative path
    let document_url = order["document_url"].as_str().unwrap();
    assert!(document_url.ends_with(&format!("/files/{}", document_path)));

    // listing by parent returns exactly this order
    let response = send_json(
        &app,
        "GET",
        &format!("/api/orders/report/{}", report_id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let orders = list["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"].as_u64().unwrap(), order_id);
    // the read model carries the parent's name
    assert_eq!(orders[0]["report_name"], "LP-001");
}

/// end-to-end scenario: creating an asset under a missing proceeding
/// fails and writes nothing
#[tokio::test]
async fn test_create_asset_with_missing_parent() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/assets",
        Some(admin.as_str()),
        &[
            ("title", "Laptop"),
            ("category", "movable"),
            ("proceeding_id", "999"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // no asset row was written
    let response = send_json(&app, "GET", "/api/assets", Some(admin.as_str()), None).await;
    let list = body_json(response).await;
    assert!(list["assets"].as_array().unwrap().is_empty());
}

/// end-to-end scenario: a description-only update leaves title and
/// attachment path untouched
#[tokio::test]
async fn test_partial_update_preserves_unsupplied_fields() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[("title", "Sprindik-A"), ("description", "initial")],
        Some(("warrant.pdf", "application/pdf", PDF)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    let order_id = order["id"].as_u64().unwrap();
    let original_path = order["document_path"].as_str().unwrap().to_string();

    // supply only a new description, no file
    let response = send_multipart(
        &app,
        "PUT",
        &format!("/api/orders/{}", order_id),
        Some(admin.as_str()),
        &[("description", "amended")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;

    assert_eq!(updated["title"], "Sprindik-A");
    assert_eq!(updated["description"], "amended");
    assert_eq!(updated["document_path"], original_path.as_str());
}

/// test that create validates required fields before any write
#[tokio::test]
async fn test_create_requires_title() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(&app, "POST", "/api/orders", Some(admin.as_str()), &[], None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/api/reports",
        Some(admin.as_str()),
        Some(serde_json::json!({ "name": "  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// test that the closed category enum rejects other values
#[tokio::test]
async fn test_asset_category_closed_enum() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_multipart(
        &app,
        "POST",
        "/api/assets",
        Some(admin.as_str()),
        &[("title", "Laptop"), ("category", "borrowed")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // category listing rejects unknown values too
    let response = send_json(
        &app,
        "GET",
        "/api/assets/category/borrowed",
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// test the category listing with both values
#[tokio::test]
async fn test_asset_category_listing() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    for (title, category) in [("Laptop", "movable"), ("Warehouse", "immovable")] {
        let response = send_multipart(
            &app,
            "POST",
            "/api/assets",
            Some(admin.as_str()),
            &[("title", title), ("category", category)],
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send_json(&app, "GET", "/api/assets/category/movable", Some(admin.as_str()), None).await;
    let list = body_json(response).await;
    let assets = list["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["title"], "Laptop");
}

/// test that parent-scoped listings 404 on a missing parent
#[tokio::test]
async fn test_list_by_missing_parent() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    for uri in [
        "/api/orders/report/999",
        "/api/proceedings/order/999",
        "/api/assets/proceeding/999",
    ] {
        let response = send_json(&app, "GET", uri, Some(admin.as_str()), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }
}

/// test updates and deletes on unknown ids
#[tokio::test]
async fn test_unknown_record_ids() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_json(&app, "GET", "/api/reports/999", Some(admin.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_multipart(
        &app,
        "PUT",
        "/api/orders/999",
        Some(admin.as_str()),
        &[("title", "ghost")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(&app, "DELETE", "/api/proceedings/999", Some(admin.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// test that deleting a parent leaves children reachable by direct id
#[tokio::test]
async fn test_parent_delete_orphans_children() {
    let (app, _db, _uploads) = test_app().await;
    let admin = login(&app, ADMIN.0, ADMIN.1).await;

    let response = send_json(
        &app,
        "POST",
        "/api/reports",
        Some(admin.as_str()),
        Some(serde_json::json!({ "name": "LP-002" })),
    )
    .await;
    let report_id = body_json(response).await["id"].as_u64().unwrap();

    let response = send_multipart(
        &app,
        "POST",
        "/api/orders",
        Some(admin.as_str()),
        &[("title", "Orphan"), ("report_id", &report_id.to_string())],
        None,
    )
    .await;
    let order_id = body_json(response).await["id"].as_u64().unwrap();

    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/reports/{}", report_id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // direct read still works, with the dangling parent id
    let response = send_json(
        &app,
        "GET",
        &format!("/api/orders/{}", order_id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await;
    assert_eq!(order["report_id"].as_u64().unwrap(), report_id);
    assert!(order["report_name"].is_null());

    // the hierarchy path 404s at the parent check
    let response = send_json(
        &app,
        "GET",
        &format!("/api/orders/report/{}", report_id),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
