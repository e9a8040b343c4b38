//! investigation order type - authorization documents scoped to a report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ReportId;

/// unique identifier for an investigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// an investigation order, optionally scoped to one report and
/// optionally carrying one attached PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationOrder {
    /// unique identifier.
    pub id: OrderId,

    /// order title.
    pub title: String,

    /// free-form description.
    pub description: Option<String>,

    /// parent report, if any. checked for existence at create/update
    /// time only; parent deletion leaves this id dangling.
    pub report_id: Option<ReportId>,

    /// stored attachment path, relative to the attachment root.
    pub document_path: Option<String>,

    /// parent report's name, joined in on reads. never persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub report_name: Option<String>,

    /// when the order was created.
    pub created_at: DateTime<Utc>,

    /// when the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl InvestigationOrder {
    /// create a new investigation order.
    pub fn new(id: OrderId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            report_id: None,
            document_path: None,
            report_name: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// partial update for an investigation order: only present fields are
/// written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvestigationOrderPatch {
    /// new title.
    pub title: Option<String>,
    /// new description.
    pub description: Option<String>,
    /// new parent report.
    pub report_id: Option<ReportId>,
    /// new attachment path. set by the service layer after a successful
    /// store, never taken from transport input.
    #[serde(skip)]
    pub document_path: Option<String>,
}
