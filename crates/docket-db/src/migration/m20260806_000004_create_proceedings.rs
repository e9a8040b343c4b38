//! create proceedings table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proceedings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proceedings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Proceedings::Title).string().not_null())
                    .col(ColumnDef::new(Proceedings::Description).text())
                    .col(ColumnDef::new(Proceedings::OrderId).big_integer())
                    .col(ColumnDef::new(Proceedings::DocumentPath).string())
                    .col(
                        ColumnDef::new(Proceedings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Proceedings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // index on order_id for listing proceedings by order
        manager
            .create_index(
                Index::create()
                    .name("idx_proceedings_order_id")
                    .table(Proceedings::Table)
                    .col(Proceedings::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Proceedings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Proceedings {
    Table,
    Id,
    Title,
    Description,
    OrderId,
    DocumentPath,
    CreatedAt,
    UpdatedAt,
}
