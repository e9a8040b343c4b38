//! proceeding type - minutes of action scoped to an investigation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrderId;

/// unique identifier for a proceeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProceedingId(pub u64);

impl From<u64> for ProceedingId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProceedingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// a minutes-of-proceeding record, optionally scoped to one
/// investigation order and optionally carrying one attached PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proceeding {
    /// unique identifier.
    pub id: ProceedingId,

    /// proceeding title.
    pub title: String,

    /// free-form description.
    pub description: Option<String>,

    /// parent investigation order, if any.
    pub order_id: Option<OrderId>,

    /// stored attachment path, relative to the attachment root.
    pub document_path: Option<String>,

    /// parent order's title, joined in on reads. never persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order_title: Option<String>,

    /// when the proceeding was created.
    pub created_at: DateTime<Utc>,

    /// when the proceeding was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Proceeding {
    /// create a new proceeding.
    pub fn new(id: ProceedingId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            order_id: None,
            document_path: None,
            order_title: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// partial update for a proceeding: only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProceedingPatch {
    /// new title.
    pub title: Option<String>,
    /// new description.
    pub description: Option<String>,
    /// new parent investigation order.
    pub order_id: Option<OrderId>,
    /// new attachment path. set by the service layer only.
    #[serde(skip)]
    pub document_path: Option<String>,
}
