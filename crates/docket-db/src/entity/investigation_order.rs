//! investigation order entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use docket_types::{InvestigationOrder, OrderId, ReportId};

/// investigation order database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "investigation_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// parent report id. not an enforced foreign key: parent deletion
    /// leaves this dangling (parent existence is a service-layer check).
    pub report_id: Option<i64>,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id"
    )]
    Report,
    #[sea_orm(has_many = "super::proceeding::Entity")]
    Proceedings,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl Related<super::proceeding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proceedings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InvestigationOrder {
    fn from(model: Model) -> Self {
        InvestigationOrder {
            id: OrderId(model.id as u64),
            title: model.title,
            description: model.description,
            report_id: model.report_id.map(|id| ReportId(id as u64)),
            document_path: model.document_path,
            report_name: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Model {
    /// conversion used by joined reads: carries the parent report's name.
    pub fn into_domain(self, report: Option<super::report::Model>) -> InvestigationOrder {
        let mut order = InvestigationOrder::from(self);
        order.report_name = report.map(|r| r.name);
        order
    }
}

impl From<&InvestigationOrder> for ActiveModel {
    fn from(order: &InvestigationOrder) -> Self {
        ActiveModel {
            id: if order.id.0 == 0 {
                NotSet
            } else {
                Set(order.id.0 as i64)
            },
            title: Set(order.title.clone()),
            description: Set(order.description.clone()),
            report_id: Set(order.report_id.map(|id| id.0 as i64)),
            document_path: Set(order.document_path.clone()),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
    }
}
