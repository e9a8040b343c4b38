//! create assets table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assets::Title).string().not_null())
                    .col(ColumnDef::new(Assets::Category).string().not_null())
                    .col(ColumnDef::new(Assets::Description).text())
                    .col(ColumnDef::new(Assets::ProceedingId).big_integer())
                    .col(ColumnDef::new(Assets::DocumentPath).string())
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // index on proceeding_id for listing assets by proceeding
        manager
            .create_index(
                Index::create()
                    .name("idx_assets_proceeding_id")
                    .table(Assets::Table)
                    .col(Assets::ProceedingId)
                    .to_owned(),
            )
            .await?;

        // index on category for the category listing endpoint
        manager
            .create_index(
                Index::create()
                    .name("idx_assets_category")
                    .table(Assets::Table)
                    .col(Assets::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    Title,
    Category,
    Description,
    ProceedingId,
    DocumentPath,
    CreatedAt,
    UpdatedAt,
}
