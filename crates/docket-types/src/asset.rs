//! asset type - evidence items scoped to a proceeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ProceedingId;

/// unique identifier for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// error returned when parsing an unknown asset category string.
#[derive(Debug, Error)]
#[error("unknown asset category: {0} (expected \"movable\" or \"immovable\")")]
pub struct AssetCategoryError(pub String);

/// the closed two-value asset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// movable evidence (vehicles, devices, cash).
    Movable,
    /// immovable evidence (land, buildings).
    Immovable,
}

impl AssetCategory {
    /// string form as persisted in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Movable => "movable",
            AssetCategory::Immovable => "immovable",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetCategory {
    type Err = AssetCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movable" => Ok(AssetCategory::Movable),
            "immovable" => Ok(AssetCategory::Immovable),
            other => Err(AssetCategoryError(other.to_string())),
        }
    }
}

/// an evidence item, optionally scoped to one proceeding and optionally
/// carrying one attached PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// unique identifier.
    pub id: AssetId,

    /// asset title.
    pub title: String,

    /// movable or immovable.
    pub category: AssetCategory,

    /// free-form description.
    pub description: Option<String>,

    /// parent proceeding, if any.
    pub proceeding_id: Option<ProceedingId>,

    /// stored attachment path, relative to the attachment root.
    pub document_path: Option<String>,

    /// parent proceeding's title, joined in on reads. never persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proceeding_title: Option<String>,

    /// when the asset was created.
    pub created_at: DateTime<Utc>,

    /// when the asset was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// create a new asset.
    pub fn new(id: AssetId, title: String, category: AssetCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            category,
            description: None,
            proceeding_id: None,
            document_path: None,
            proceeding_title: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// partial update for an asset: only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPatch {
    /// new title.
    pub title: Option<String>,
    /// new category.
    pub category: Option<AssetCategory>,
    /// new description.
    pub description: Option<String>,
    /// new parent proceeding.
    pub proceeding_id: Option<ProceedingId>,
    /// new attachment path. set by the service layer only.
    #[serde(skip)]
    pub document_path: Option<String>,
}
