//! database migrations for docket.

pub use sea_orm_migration::prelude::*;

mod m20260806_000001_create_users;
mod m20260806_000002_create_reports;
mod m20260806_000003_create_investigation_orders;
mod m20260806_000004_create_proceedings;
mod m20260806_000005_create_assets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260806_000001_create_users::Migration),
            Box::new(m20260806_000002_create_reports::Migration),
            Box::new(m20260806_000003_create_investigation_orders::Migration),
            Box::new(m20260806_000004_create_proceedings::Migration),
            Box::new(m20260806_000005_create_assets::Migration),
        ]
    }
}
