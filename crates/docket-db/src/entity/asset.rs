//! asset entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use tracing::warn;

use docket_types::{Asset, AssetCategory, AssetId, ProceedingId};

/// asset database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    /// category stored as its string form ("movable" / "immovable").
    pub category: String,
    pub description: Option<String>,
    /// parent proceeding id. not an enforced foreign key.
    pub proceeding_id: Option<i64>,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proceeding::Entity",
        from = "Column::ProceedingId",
        to = "super::proceeding::Column::Id"
    )]
    Proceeding,
}

impl Related<super::proceeding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proceeding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Asset {
    fn from(model: Model) -> Self {
        let category = model.category.parse().unwrap_or_else(|_| {
            warn!(asset_id = model.id, category = %model.category, "unknown asset category in database, treating as movable");
            AssetCategory::Movable
        });

        Asset {
            id: AssetId(model.id as u64),
            title: model.title,
            category,
            description: model.description,
            proceeding_id: model.proceeding_id.map(|id| ProceedingId(id as u64)),
            document_path: model.document_path,
            proceeding_title: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Model {
    /// conversion used by joined reads: carries the parent proceeding's title.
    pub fn into_domain(self, proceeding: Option<super::proceeding::Model>) -> Asset {
        let mut asset = Asset::from(self);
        asset.proceeding_title = proceeding.map(|p| p.title);
        asset
    }
}

impl From<&Asset> for ActiveModel {
    fn from(asset: &Asset) -> Self {
        ActiveModel {
            id: if asset.id.0 == 0 {
                NotSet
            } else {
                Set(asset.id.0 as i64)
            },
            title: Set(asset.title.clone()),
            category: Set(asset.category.as_str().to_string()),
            description: Set(asset.description.clone()),
            proceeding_id: Set(asset.proceeding_id.map(|id| id.0 as i64)),
            document_path: Set(asset.document_path.clone()),
            created_at: Set(asset.created_at),
            updated_at: Set(asset.updated_at),
        }
    }
}
