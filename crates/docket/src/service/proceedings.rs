//! proceeding operations, including the attached-document lifecycle.

use tracing::{info, warn};

use docket_db::{Database, DocketDb};
use docket_types::{OrderId, Proceeding, ProceedingId, ProceedingPatch};

use crate::attachments::{AttachmentKind, AttachmentStore, UploadedFile};

use super::{require_non_blank, Result, ServiceError};

/// input for creating a proceeding.
#[derive(Debug, Clone)]
pub struct CreateProceeding {
    /// proceeding title.
    pub title: String,
    /// free-form description.
    pub description: Option<String>,
    /// parent investigation order; must exist when given.
    pub order_id: Option<OrderId>,
}

/// create a new proceeding, optionally storing an attachment.
pub async fn create_proceeding(
    db: &DocketDb,
    attachments: &AttachmentStore,
    req: CreateProceeding,
    file: Option<UploadedFile>,
) -> Result<Proceeding> {
    require_non_blank("title", &req.title)?;

    if let Some(order_id) = req.order_id {
        if db.get_order(order_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("investigation order"));
        }
    }

    let document_path = match file {
        Some(ref file) => Some(attachments.store(AttachmentKind::Proceeding, file).await?),
        None => None,
    };

    let mut proceeding = Proceeding::new(ProceedingId(0), req.title);
    proceeding.description = req.description;
    proceeding.order_id = req.order_id;
    proceeding.document_path = document_path.clone();

    let created = match db.create_proceeding(&proceeding).await {
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

    info!(proceeding_id = created.id.0, title = %created.title, "proceeding created");
    Ok(created)
}

/// get a proceeding by id.
pub async fn get_proceeding(db: &DocketDb, id: ProceedingId) -> Result<Proceeding> {
    db.get_proceeding(id)
        .await?
        .ok_or(ServiceError::NotFound("proceeding"))
}

/// list all proceedings.
pub async fn list_proceedings(db: &DocketDb) -> Result<Vec<Proceeding>> {
    Ok(db.list_proceedings().await?)
}

/// list proceedings belonging to an investigation order. the order
/// must exist.
pub async fn list_proceedings_for_order(
    db: &DocketDb,
    order_id: OrderId,
) -> Result<Vec<Proceeding>> {
    if db.get_order(order_id).await?.is_none() {
        return Err(ServiceError::ParentNotFound("investigation order"));
    }
    Ok(db.list_proceedings_for_order(order_id).await?)
}

/// apply a partial update to a proceeding. see
/// [`orders::update_order`](super::orders::update_order) for the
/// attachment-replacement contract.
pub async fn update_proceeding(
    db: &DocketDb,
    attachments: &AttachmentStore,
    id: ProceedingId,
    mut patch: ProceedingPatch,
    file: Option<UploadedFile>,
) -> Result<Proceeding> {
    let current = db
        .get_proceeding(id)
        .await?
        .ok_or(ServiceError::NotFound("proceeding"))?;

    if let Some(ref title) = patch.title {
        require_non_blank("title", title)?;
    }
    if let Some(order_id) = patch.order_id {
        if db.get_order(order_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("investigation order"));
        }
    }

    if let Some(ref file) = file {
        if let Some(ref old_path) = current.document_path {
            attachments.remove(old_path).await?;
        }
        patch.document_path = Some(attachments.store(AttachmentKind::Proceeding, file).await?);
    }

    db.update_proceeding(id, &patch).await?;
    info!(proceeding_id = id.0, "proceeding updated");

    db.get_proceeding(id)
        .await?
        .ok_or(ServiceError::NotFound("proceeding"))
}

/// delete a proceeding and its attachment, if any.
pub async fn delete_proceeding(
    db: &DocketDb,
    attachments: &AttachmentStore,
    id: ProceedingId,
) -> Result<()> {
    let current = db
        .get_proceeding(id)
        .await?
        .ok_or(ServiceError::NotFound("proceeding"))?;

    if let Some(ref path) = current.document_path {
        attachments.remove(path).await?;
    }
    db.delete_proceeding(id).await?;
    info!(proceeding_id = id.0, "proceeding deleted");
    Ok(())
}
