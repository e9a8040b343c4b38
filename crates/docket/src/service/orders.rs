//! investigation order operations, including the attached-document
//! lifecycle.

use tracing::{info, warn};

use docket_db::{Database, DocketDb};
use docket_types::{InvestigationOrder, InvestigationOrderPatch, OrderId, ReportId};

use crate::attachments::{AttachmentKind, AttachmentStore, UploadedFile};

use super::{require_non_blank, Result, ServiceError};

/// input for creating an investigation order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// order title.
    pub title: String,
    /// free-form description.
    pub description: Option<String>,
    /// parent report; must exist when given.
    pub report_id: Option<ReportId>,
}

/// create a new investigation order, optionally storing an attachment.
///
/// validation and the parent-existence check happen before any write.
pub async fn create_order(
    db: &DocketDb,
    attachments: &AttachmentStore,
    req: CreateOrder,
    file: Option<UploadedFile>,
) -> Result<InvestigationOrder> {
    require_non_blank("title", &req.title)?;

    if let Some(report_id) = req.report_id {
        if db.get_report(report_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("report"));
        }
    }

    let document_path = match file {
        Some(ref file) => Some(
            attachments
                .store(AttachmentKind::InvestigationOrder, file)
                .await?,
        ),
        None => None,
    };

    let mut order = InvestigationOrder::new(OrderId(0), req.title);
    order.description = req.description;
    order.report_id = req.report_id;
    order.document_path = document_path.clone();

    let created = match db.create_order(&order).await {
        Ok(created) => created,
        Err(e) => {
            // the insert failed after the file was written; clean up the
            // fresh file so nothing unreferenced accumulates
            if let Some(ref path) = document_path {
                if let Err(cleanup) = attachments.remove(path).await {
                    warn!(path = %path, error = %cleanup, "failed to clean up attachment after insert failure");
                }
            }
            return Err(e.into());
        }
    };

    info!(order_id = created.id.0, title = %created.title, "investigation order created");
    Ok(created)
}

/// get an investigation order by id.
pub async fn get_order(db: &DocketDb, id: OrderId) -> Result<InvestigationOrder> {
    db.get_order(id)
        .await?
        .ok_or(ServiceError::NotFound("investigation order"))
}

/// list all investigation orders.
pub async fn list_orders(db: &DocketDb) -> Result<Vec<InvestigationOrder>> {
    Ok(db.list_orders().await?)
}

/// list investigation orders belonging to a report. the report must
/// exist.
pub async fn list_orders_for_report(
    db: &DocketDb,
    report_id: ReportId,
) -> Result<Vec<InvestigationOrder>> {
    if db.get_report(report_id).await?.is_none() {
        return Err(ServiceError::ParentNotFound("report"));
    }
    Ok(db.list_orders_for_report(report_id).await?)
}

/// apply a partial update to an investigation order.
///
/// with a new file, the old attachment (if any) is removed first; a
/// removal failure aborts the update so the row never ends up
/// referencing a file the caller believes replaced.
pub async fn update_order(
    db: &DocketDb,
    attachments: &AttachmentStore,
    id: OrderId,
    mut patch: InvestigationOrderPatch,
    file: Option<UploadedFile>,
) -> Result<InvestigationOrder> {
    let current = db
        .get_order(id)
        .await?
        .ok_or(ServiceError::NotFound("investigation order"))?;

    if let Some(ref title) = patch.title {
        require_non_blank("title", title)?;
    }
    if let Some(report_id) = patch.report_id {
        if db.get_report(report_id).await?.is_none() {
            return Err(ServiceError::ParentNotFound("report"));
        }
    }

    if let Some(ref file) = file {
        if let Some(ref old_path) = current.document_path {
            attachments.remove(old_path).await?;
        }
        patch.document_path = Some(
            attachments
                .store(AttachmentKind::InvestigationOrder, file)
                .await?,
        );
    }

    db.update_order(id, &patch).await?;
    info!(order_id = id.0, "investigation order updated");

    db.get_order(id)
        .await?
        .ok_or(ServiceError::NotFound("investigation order"))
}

/// delete an investigation order and its attachment, if any.
///
/// the attachment is removed first; a removal failure aborts so a
/// deleted row can never leave a referenced file claimed gone.
pub async fn delete_order(db: &DocketDb, attachments: &AttachmentStore, id: OrderId) -> Result<()> {
    let current = db
        .get_order(id)
        .await?
        .ok_or(ServiceError::NotFound("investigation order"))?;

    if let Some(ref path) = current.document_path {
        attachments.remove(path).await?;
    }
    db.delete_order(id).await?;
    info!(order_id = id.0, "investigation order deleted");
    Ok(())
}
