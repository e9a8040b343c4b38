//! report type - the root of the evidence hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// unique identifier for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub u64);

impl From<u64> for ReportId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// a police report: the top-level case record.
///
/// reports carry no attachment; they exist to scope investigation orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// unique identifier.
    pub id: ReportId,

    /// report name (e.g. a case reference like "LP-001").
    pub name: String,

    /// when the report was created.
    pub created_at: DateTime<Utc>,

    /// when the report was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// create a new report with the given name.
    pub fn new(id: ReportId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// partial update for a report: only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
    /// new report name.
    pub name: Option<String>,
}
