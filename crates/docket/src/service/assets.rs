//! asset operations, including the attached-document lifecycle and the
//! category listing.

use tracing::{info, warn};

use docket_db::{Database, DocketDb};
use docket_types::{Asset, AssetCategory, AssetId, AssetPatch, ProceedingId};

use crate::attachments::{AttachmentKind, AttachmentStore, UploadedFile};

use super::{require_non_blank, Result, ServiceError};

/// input for creating an asset.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    /// asset title.
    pub title: String,
    /// movable or immovable.
    pub category: AssetCategory,
    /// free-form description.
    pub description: Option<String>,
    /// parent proceeding; must exist when given.
    pub proceeding_id: Option<ProceedingId>,
}

/// create a new asset, optionally storing an attachment.
pub async fn create_asset(
    db: &DocketDb,
    attachments: &AttachmentStore,
    req: CreateAsset,
    file: Option<UploadedFile>,
) -> Result<Asset> {
    require_non_blank("title", &req.title)?;

    if let Some(proceeding_id) = req.proceeding_id {
        if db.get_proceeding(proceeding_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("proceeding"));
        }
    }

    let document_path = match file {
        Some(ref file) => Some(attachments.store(AttachmentKind::Asset, file).await?),
        None => None,
    };

    let mut asset = Asset::new(AssetId(0), req.title, req.category);
    asset.description = req.description;
    asset.proceeding_id = req.proceeding_id;
    asset.document_path = document_path.clone();

    let created = match db.create_asset(&asset).await {
        Ok(created) => created,
        Err(e) => {
            if let Some(ref path) = document_path {
                if let Err(cleanup) = attachments.remove(path).await {
                    warn!(path = %path, error = %cleanup, "failed to clean up attachment after insert failure");
                }
            }
            return Err(e.into());
        }
    };

    info!(asset_id = created.id.0, title = %created.title, category = %created.category, "asset created");
    Ok(created)
}

/// get an asset by id.
pub async fn get_asset(db: &DocketDb, id: AssetId) -> Result<Asset> {
    db.get_asset(id)
        .await?
        .ok_or(ServiceError::NotFound("asset"))
}

/// list all assets.
pub async fn list_assets(db: &DocketDb) -> Result<Vec<Asset>> {
    Ok(db.list_assets().await?)
}

/// list assets belonging to a proceeding. the proceeding must exist.
pub async fn list_assets_for_proceeding(
    db: &DocketDb,
    proceeding_id: ProceedingId,
) -> Result<Vec<Asset>> {
    if db.get_proceeding(proceeding_id).await?.is_none() {
        return Err(ServiceError::ParentNotFound("proceeding"));
    }
    Ok(db.list_assets_for_proceeding(proceeding_id).await?)
}

/// list assets in a category.
pub async fn list_assets_for_category(
    db: &DocketDb,
    category: AssetCategory,
) -> Result<Vec<Asset>> {
    Ok(db.list_assets_for_category(category).await?)
}

/// apply a partial update to an asset. see
/// [`orders::update_order`](super::orders::update_order) for the
/// attachment-replacement contract.
pub async fn update_asset(
    db: &DocketDb,
    attachments: &AttachmentStore,
    id: AssetId,
    mut patch: AssetPatch,
    file: Option<UploadedFile>,
) -> Result<Asset> {
    let current = db
        .get_asset(id)
        .await?
        .ok_or(ServiceError::NotFound("asset"))?;

    if let Some(ref title) = patch.title {
        require_non_blank("title", title)?;
    }
    if let Some(proceeding_id) = patch.proceeding_id {
        if db.get_proceeding(proceeding_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("proceeding"));
        }
    }

    if let Some(ref file) = file {
        if let Some(ref old_path) = current.document_path {
            attachments.remove(old_path).await?;
        }
        patch.document_path = Some(attachments.store(AttachmentKind::Asset, file).await?);
    }

    db.update_asset(id, &patch).await?;
    info!(asset_id = id.0, "asset updated");

    db.get_asset(id)
        .await?
        .ok_or(ServiceError::NotFound("asset"))
}

/// delete an asset and its attachment, if any.
pub async fn delete_asset(db: &DocketDb, attachments: &AttachmentStore, id: AssetId) -> Result<()> {
    let current = db
        .get_asset(id)
        .await?
        .ok_or(ServiceError::NotFound("asset"))?;

    if let Some(ref path) = current.document_path {
        attachments.remove(path).await?;
    }
    db.delete_asset(id).await?;
    info!(asset_id = id.0, "asset deleted");
    Ok(())
}
