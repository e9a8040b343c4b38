//! report operations. reports are the hierarchy root and carry no
//! attachment.

use tracing::info;

use docket_db::{Database, DocketDb};
use docket_types::{Report, ReportId, ReportPatch};

use super::{require_non_blank, Result, ServiceError};

/// input for creating a report.
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// report name.
    pub name: String,
}

/// create a new report.
pub async fn create_report(db: &DocketDb, req: CreateReport) -> Result<Report> {
    require_non_blank("name", &req.name)?;

    let report = db
        .create_report(&Report::new(ReportId(0), req.name))
        .await?;
    info!(report_id = report.id.0, name = %report.name, "report created");
    Ok(report)
}

/// get a report by id.
pub async fn get_report(db: &DocketDb, id: ReportId) -> Result<Report> {
    db.get_report(id)
        .await?
        .ok_or(ServiceError::NotFound("report"))
}

/// list all reports.
pub async fn list_reports(db: &DocketDb) -> Result<Vec<Report>> {
    Ok(db.list_reports().await?)
}

/// apply a partial update to a report.
pub async fn update_report(db: &DocketDb, id: ReportId, patch: ReportPatch) -> Result<Report> {
    if db.get_report(id).await?.is_none() {
        return Err(ServiceError::NotFound("report"));
    }
    if let Some(ref name) = patch.name {
        require_non_blank("name", name)?;
    }

    db.update_report(id, &patch).await?;
    db.get_report(id)
        .await?
        .ok_or(ServiceError::NotFound("report"))
}

/// delete a report permanently.
///
/// children are not cascaded: any investigation orders scoped to this
/// report keep their (now dangling) parent id.
pub async fn delete_report(db: &DocketDb, id: ReportId) -> Result<()> {
    if db.get_report(id).await?.is_none() {
        return Err(ServiceError::NotFound("report"));
    }
    db.delete_report(id).await?;
    info!(report_id = id.0, "report deleted");
    Ok(())
}
