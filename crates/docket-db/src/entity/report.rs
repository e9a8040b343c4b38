//! report entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use docket_types::{Report, ReportId};

/// report database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investigation_order::Entity")]
    InvestigationOrders,
}

impl Related<super::investigation_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestigationOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Report {
    fn from(model: Model) -> Self {
        Report {
            id: ReportId(model.id as u64),
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Report> for ActiveModel {
    fn from(report: &Report) -> Self {
        ActiveModel {
            id: if report.id.0 == 0 {
                NotSet
            } else {
                Set(report.id.0 as i64)
            },
            name: Set(report.name.clone()),
            created_at: Set(report.created_at),
            updated_at: Set(report.updated_at),
        }
    }
}
