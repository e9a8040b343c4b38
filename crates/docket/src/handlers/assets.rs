//! asset endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use docket_types::{Asset, AssetCategory, AssetId, AssetPatch, ProceedingId};

use crate::service::assets as assets_service;
use crate::AppState;

use super::auth::{SessionContext, ADMIN_ONLY};
use super::upload::FormData;
use super::{document_url, ApiError};

/// asset representation in api responses.
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: u64,
    pub title: String,
    pub category: AssetCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proceeding_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proceeding_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AssetResponse {
    fn new(asset: Asset, base_url: &str) -> Self {
        Self {
            id: asset.id.0,
            title: asset.title,
            category: asset.category,
            description: asset.description,
            proceeding_id: asset.proceeding_id.map(|id| id.0),
            proceeding_title: asset.proceeding_title,
            document_url: document_url(base_url, asset.document_path.as_deref()),
            document_path: asset.document_path,
            created_at: asset.created_at.to_rfc3339(),
            updated_at: asset.updated_at.to_rfc3339(),
        }
    }
}

/// response wrapper for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListAssetsResponse {
    pub assets: Vec<AssetResponse>,
}

/// response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteAssetResponse {}

/// create the assets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/proceeding/{proceeding_id}", get(list_assets_for_proceeding))
        .route("/category/{category}", get(list_assets_for_category))
        .route(
            "/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}

/// parse the closed category enum, rejecting anything else.
fn parse_category(value: &str) -> Result<AssetCategory, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::bad_request("invalid category: must be movable or immovable"))
}

/// list all assets.
///
/// `GET /api/assets`
async fn list_assets(
    _ctx: SessionContext,
    State(state): State<AppState>,
) -> Result<Json<ListAssetsResponse>, ApiError> {
    let assets = assets_service::list_assets(&state.db).await?;
    Ok(Json(ListAssetsResponse {
        assets: assets
            .into_iter()
            .map(|asset| AssetResponse::new(asset, &state.config.server_url))
            .collect(),
    }))
}

/// list assets belonging to a proceeding.
///
/// `GET /api/assets/proceeding/{proceeding_id}`
async fn list_assets_for_proceeding(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(proceeding_id): Path<u64>,
) -> Result<Json<ListAssetsResponse>, ApiError> {
    let assets =
        assets_service::list_assets_for_proceeding(&state.db, ProceedingId(proceeding_id)).await?;
    Ok(Json(ListAssetsResponse {
        assets: assets
            .into_iter()
            .map(|asset| AssetResponse::new(asset, &state.config.server_url))
            .collect(),
    }))
}

/// list assets in a category.
///
/// `GET /api/assets/category/{category}`
async fn list_assets_for_category(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ListAssetsResponse>, ApiError> {
    let category = parse_category(&category)?;
    let assets = assets_service::list_assets_for_category(&state.db, category).await?;
    Ok(Json(ListAssetsResponse {
        assets: assets
            .into_iter()
            .map(|asset| AssetResponse::new(asset, &state.config.server_url))
            .collect(),
    }))
}

/// get an asset by id.
///
/// `GET /api/assets/{id}`
async fn get_asset(
    _ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = assets_service::get_asset(&state.db, AssetId(id)).await?;
    Ok(Json(AssetResponse::new(asset, &state.config.server_url)))
}

/// create a new asset, optionally with a PDF.
///
/// `POST /api/assets` (administrator only, multipart)
async fn create_asset(
    ctx: SessionContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let category = form
        .take("category")
        .ok_or_else(|| ApiError::bad_request("category is required"))?;
    let req = assets_service::CreateAsset {
        title: form.take("title").unwrap_or_default(),
        category: parse_category(&category)?,
        description: form.take("description"),
        proceeding_id: form.take_id("proceeding_id")?.map(ProceedingId),
    };

    let asset = assets_service::create_asset(&state.db, &state.attachments, req, form.file).await?;
    Ok((
        StatusCode::CREATED,
        Json(AssetResponse::new(asset, &state.config.server_url)),
    ))
}

/// update an asset. only supplied fields change; a new file supersedes
/// the stored attachment.
///
/// `PUT /api/assets/{id}` (administrator only, multipart)
async fn update_asset(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<AssetResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    let mut form = FormData::read(multipart).await?;
    let category = match form.take("category") {
        Some(value) => Some(parse_category(&value)?),
        None => None,
    };
    let patch = AssetPatch {
        title: form.take("title"),
        category,
        description: form.take("description"),
        proceeding_id: form.take_id("proceeding_id")?.map(ProceedingId),
        document_path: None,
    };

    let asset =
        assets_service::update_asset(&state.db, &state.attachments, AssetId(id), patch, form.file)
            .await?;
    Ok(Json(AssetResponse::new(asset, &state.config.server_url)))
}

/// delete an asset and its attachment.
///
/// `DELETE /api/assets/{id}` (administrator only)
async fn delete_asset(
    ctx: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteAssetResponse>, ApiError> {
    ctx.require_role(ADMIN_ONLY)?;

    assets_service::delete_asset(&state.db, &state.attachments, AssetId(id)).await?;
    Ok(Json(DeleteAssetResponse {}))
}
