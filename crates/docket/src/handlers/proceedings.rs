//! proceeding endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use docket_types::{OrderId, Proceeding, ProceedingId, ProceedingPatch};

use crate::service::proceedings as proceedings_service;
use crate::AppState;

use super::auth::{SessionContext, ADMIN_ONLY};
use super::upload::FormData;
use super::{document_url, ApiError};

/// proceeding representation in api responses.
#[derive(Debug, Serialize)]
pub struct ProceedingResponse {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProceedingResponse {
    fn new(proceeding: Proceeding, base_url: &str) -> Self {
        Self {
            id: proceeding.id.0,
            title: proceeding.title,
            description: proceeding.description,
            order_id: proceeding.order_id.map(|id| id.0),
            order_title: proceeding.order_title,
            document_url: document_url(base_url, proceeding.document_path.as_deref()),
            document_path: proceeding.document_path,
            created_at: proceeding.created_at.to_rfc3339(),
            updated_at: proceeding.updated_at.to_rfc3339(),
        }
    }
}

/// response wrapper for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListProceedingsResponse {
    pub proceedings: Vec<ProceedingResponse>,
}

/// response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteProceedingResponse {}

/// create the proceedings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_proceedings).post(create_proceeding))
        .route("/order/{order_id}", get(list_proceedings_for_order))
        .route(
            "/{id}",
            get(get_proceeding)
                .put(update_proceeding)
                .delete(delete_proceeding),
        )
}

/// list all proceedings.
///
/// `GET /api/proceedings`
async fn list_proceedings(
    _ctx: SessionContext,
    State(state): State<AppState>,
) -> Result<Json<ListProceedingsResponse>, ApiError> {
    let proceedings = proceedings_service::list_proceedings(&state.db).await?;
    Ok(Json(ListProceedingsResponse {
        proceedings: proceedings
            .into_iter()
            .map(|proceeding| ProceedingResponse::new(proceeding, &state.config.server_url))
            .collect(),
    }))
}

/// list proceedings belonging to an investigation order.
///
/// `GET /api/proceedings/order/{order_id}`
async fn list_proceedings_for_order(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<ListProceedingsResponse>, ApiError> {
    let proceedings =
        proceedings_service::list_proceedings_for_order(&state.db, OrderId(order_id)).await?;
    Ok(Json(ListProceedingsResponse {
        proceedings: proceedings
            .into_iter()
            .map(|proceeding| ProceedingResponse::new(proceeding, &state.config.server_url))
            .collect(),
    }))
}

/// get a proceeding by id.
///
/// `GET /api/proceedings/{id}`
async fn get_proceeding(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ProceedingResponse>, ApiError> {
    let proceeding = proceedings_service::get_proceeding(&state.db, ProceedingId(id)).await?;
    Ok(Json(ProceedingResponse::new(
        proceeding,
        &state.config.server_url,
    )))
}

/// create a new proceeding, optionally with a PDF.
///
/// `POST /api/proceedings` (administrator only, multipart)
async fn create_proceeding(
    ctx: SessionContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProceedingResponse>), ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let req = proceedings_service::CreateProceeding {
        title: form.take("title").unwrap_or_default(),
        description: form.take("description"),
        order_id: form.take_id("order_id")?.map(OrderId),
    };

    let proceeding =
        proceedings_service::create_proceeding(&state.db, &state.attachments, req, form.file)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProceedingResponse::new(
            proceeding,
            &state.config.server_url,
        )),
    ))
}

/// update a proceeding. only supplied fields change; a new file
/// supersedes the stored attachment.
///
/// `PUT /api/proceedings/{id}` (administrator only, multipart)
async fn update_proceeding(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<ProceedingResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let patch = ProceedingPatch {
        title: form.take("title"),
        description: form.take("description"),
        order_id: form.take_id("order_id")?.map(OrderId),
        document_path: None,
    };

    let proceeding = proceedings_service::update_proceeding(
        &state.db,
        &state.attachments,
        ProceedingId(id),
        patch,
        form.file,
    )
    .await?;
    Ok(Json(ProceedingResponse::new(
        proceeding,
        &state.config.server_url,
    )))
}

/// delete a proceeding and its attachment.
///
/// `DELETE /api/proceedings/{id}` (administrator only)
async fn delete_proceeding(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteProceedingResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    proceedings_service::delete_proceeding(&state.db, &state.attachments, ProceedingId(id))
        .await?;
    Ok(Json(DeleteProceedingResponse {}))
}
