//! create investigation_orders table migration
//!
//! report_id is indexed but carries no foreign-key constraint: parent
//! existence is checked by the service layer at create/update time, and
//! parent deletion must not touch (or be blocked by) children.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestigationOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestigationOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvestigationOrders::Title).string().not_null())
                    .col(ColumnDef::new(InvestigationOrders::Description).text())
                    .col(ColumnDef::new(InvestigationOrders::ReportId).big_integer())
                    .col(ColumnDef::new(InvestigationOrders::DocumentPath).string())
                    .col(
                        ColumnDef::new(InvestigationOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestigationOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // index on report_id for listing orders by report
        manager
            .create_index(
                Index::create()
                    .name("idx_investigation_orders_report_id")
                    .table(InvestigationOrders::Table)
                    .col(InvestigationOrders::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestigationOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvestigationOrders {
    Table,
    Id,
    Title,
    Description,
    ReportId,
    DocumentPath,
    CreatedAt,
    UpdatedAt,
}
