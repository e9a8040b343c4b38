//! investigation order endpoints.
//!
//! create and update take `multipart/form-data` so a PDF can ride
//! along with the text fields.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use docket_types::{InvestigationOrder, InvestigationOrderPatch, OrderId, ReportId};

use crate::service::orders as orders_service;
use crate::AppState;

use super::auth::{SessionContext, ADMIN_ONLY};
use super::upload::FormData;
use super::{document_url, ApiError};

/// investigation order representation in api responses.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
    /// absolute url for the attachment, derived from the stored
    /// relative path. presentation only, never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderResponse {
    fn new(order: InvestigationOrder, base_url: &str) -> Self {
        Self {
            id: order.id.0,
            title: order.title,
            description: order.description,
            report_id: order.report_id.map(|id| id.0),
            report_name: order.report_name,
            document_url: document_url(base_url, order.document_path.as_deref()),
            document_path: order.document_path,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// response wrapper for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
}

/// response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteOrderResponse {}

/// create the investigation orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/report/{report_id}", get(list_orders_for_report))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// list all investigation orders.
///
/// `GET /api/orders`
async fn list_orders(
    _ctx: SessionContext,
    State(state): State<AppState>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    let orders = orders_service::list_orders(&state.db).await?;
    Ok(Json(ListOrdersResponse {
        orders: orders
            .into_iter()
            .map(|order| OrderResponse::new(order, &state.config.server_url))
            .collect(),
    }))
}

/// list investigation orders belonging to a report.
///
/// `GET /api/orders/report/{report_id}`
async fn list_orders_for_report(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(report_id): Path<u64>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    let orders = orders_service::list_orders_for_report(&state.db, ReportId(report_id)).await?;
    Ok(Json(ListOrdersResponse {
        orders: orders
            .into_iter()
            .map(|order| OrderResponse::new(order, &state.config.server_url))
            .collect(),
    }))
}

/// get an investigation order by id.
///
/// `GET /api/orders/{id}`
async fn get_order(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = orders_service::get_order(&state.db, OrderId(id)).await?;
    Ok(Json(OrderResponse::new(order, &state.config.server_url)))
}

/// create a new investigation order, optionally with a PDF.
///
/// `POST /api/orders` (administrator only, multipart)
async fn create_order(
    ctx: SessionContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let req = orders_service::CreateOrder {
        title: form.take("title").unwrap_or_default(),
        description: form.take("description"),
        report_id: form.take_id("report_id")?.map(ReportId),
    };

    let order =
        orders_service::create_order(&state.db, &state.attachments, req, form.file).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::new(order, &state.config.server_url)),
    ))
}

/// update an investigation order. only supplied fields change; a new
/// file supersedes the stored attachment.
///
/// `PUT /api/orders/{id}` (administrator only, multipart)
async fn update_order(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<OrderResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let patch = InvestigationOrderPatch {
        title: form.take("title"),
        description: form.take("description"),
        report_id: form.take_id("report_id")?.map(ReportId),
        document_path: None,
    };

    let order =
        orders_service::update_order(&state.db, &state.attachments, OrderId(id), patch, form.file)
            .await?;
    Ok(Json(OrderResponse::new(order, &state.config.server_url)))
}

/// delete an investigation order and its attachment.
///
/// `DELETE /api/orders/{id}` (administrator only)
async fn delete_order(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteOrderResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    orders_service::delete_order(&state.db, &state.attachments, OrderId(id)).await?;
    Ok(Json(DeleteOrderResponse {}))
}
