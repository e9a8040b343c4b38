//! proceeding entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use docket_types::{OrderId, Proceeding, ProceedingId};

/// proceeding database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "proceedings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// parent investigation order id. not an enforced foreign key.
    pub order_id: Option<i64>,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investigation_order::Entity",
        from = "Column::OrderId",
        to = "super::investigation_order::Column::Id"
    )]
    InvestigationOrder,
    #[sea_orm(has_many = "super::asset::Entity")]
    Assets,
}

impl Related<super::investigation_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestigationOrder.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Proceeding {
    fn from(model: Model) -> Self {
        Proceeding {
            id: ProceedingId(model.id as u64),
            title: model.title,
            description: model.description,
            order_id: model.order_id.map(|id| OrderId(id as u64)),
            document_path: model.document_path,
            order_title: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Model {
    /// conversion used by joined reads: carries the parent order's title.
    pub fn into_domain(self, order: Option<super::investigation_order::Model>) -> Proceeding {
        let mut proceeding = Proceeding::from(self);
        proceeding.order_title = order.map(|o| o.title);
        proceeding
    }
}

impl From<&Proceeding> for ActiveModel {
    fn from(proceeding: &Proceeding) -> Self {
        ActiveModel {
            id: if proceeding.id.0 == 0 {
                NotSet
            } else {
                Set(proceeding.id.0 as i64)
            },
            title: Set(proceeding.title.clone()),
            description: Set(proceeding.description.clone()),
            order_id: Set(proceeding.order_id.map(|id| id.0 as i64)),
            document_path: Set(proceeding.document_path.clone()),
            created_at: Set(proceeding.created_at),
            updated_at: Set(proceeding.updated_at),
        }
    }
}
