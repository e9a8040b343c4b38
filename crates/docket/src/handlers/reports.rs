//! report endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use docket_types::{Report, ReportId, ReportPatch};

use crate::service::reports as reports_service;
use crate::AppState;

use super::auth::{SessionContext, ADMIN_ONLY};
use super::ApiError;

/// report representation in api responses.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: u64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id.0,
            name: report.name,
            created_at: report.created_at.to_rfc3339(),
            updated_at: report.updated_at.to_rfc3339(),
        }
    }
}

/// response wrapper for the list endpoint.
#[derive(Debug, Serialize)]
pub struct ListReportsResponse {
    pub reports: Vec<ReportResponse>,
}

/// request body for creating a report.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub name: String,
}

/// request body for updating a report.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReportRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteReportResponse {}

/// create the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route(
            "/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
}

/// list all reports.
///
/// `GET /api/reports`
async fn list_reports(
    _ctx: SessionContext,
    State(state): State<AppState>,
) -> Result<Json<ListReportsResponse>, ApiError> {
    let reports = reports_service::list_reports(&state.db).await?;
    Ok(Json(ListReportsResponse {
        reports: reports.into_iter().map(ReportResponse::from).collect(),
    }))
}

/// get a report by id.
///
/// `GET /api/reports/{id}`
async fn get_report(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = reports_service::get_report(&state.db, ReportId(id)).await?;
    Ok(Json(ReportResponse::from(report)))
}

/// create a new report.
///
/// `POST /api/reports` (administrator only)
async fn create_report(
    ctx: SessionContext,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let report =
        reports_service::create_report(&state.db, reports_service::CreateReport { name: req.name })
            .await?;
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// update a report. only supplied fields change.
///
/// `PUT /api/reports/{id}` (administrator only)
async fn update_report(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let report =
        reports_service::update_report(&state.db, ReportId(id), ReportPatch { name: req.name })
            .await?;
    Ok(Json(ReportResponse::from(report)))
}

/// delete a report. children are not cascaded.
///
/// `DELETE /api/reports/{id}` (administrator only)
async fn delete_report(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteReportResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    reports_service::delete_report(&state.db, ReportId(id)).await?;
    Ok(Json(DeleteReportResponse {}))
}
