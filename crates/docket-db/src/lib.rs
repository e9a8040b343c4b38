//! database layer for docket.
//!
//! this crate provides persistent storage for:
//! - Reports
//! - InvestigationOrders
//! - Proceedings
//! - Assets
//! - Users
//!
//! deletion is permanent everywhere: rows are removed, not marked.
//! attachment files referenced by rows are the service layer's concern.

#![warn(missing_docs)]

mod entity;
mod error;
mod migration;

pub use error::Error;

use std::future::Future;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database as SeaOrmDatabase, DatabaseConnection, EntityTrait,
    QueryFilter, sea_query::Expr,
};
use sea_orm_migration::MigratorTrait;

use docket_types::{
    Asset, AssetCategory, AssetId, AssetPatch, DatabaseConfig, InvestigationOrder,
    InvestigationOrderPatch, OrderId, Proceeding, ProceedingId, ProceedingPatch, Report, ReportId,
    ReportPatch, User, UserId, UserPatch,
};

/// result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// database trait for docket storage operations.
///
/// this trait abstracts over different database backends (sqlite,
/// postgresql). `get_*` on an unknown id returns `Ok(None)`, never an
/// error. update operations write only the fields present in the patch
/// (plus `updated_at`).
pub trait Database: Send + Sync {
    // ─── Health Check ─────────────────────────────────────────────────────────

    /// ping the database to verify connectivity.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    // ─── User Operations ─────────────────────────────────────────────────────

    /// create a new user. returns the created user with its assigned id.
    /// a duplicate username yields [`Error::AlreadyExists`].
    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send;

    /// get a user by id.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<Option<User>>> + Send;

    /// get a user by username.
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send;

    /// list all users.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// apply a partial update to a user.
    fn update_user(
        &self,
        id: UserId,
        patch: &UserPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete a user permanently.
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<()>> + Send;

    // ─── Report Operations ───────────────────────────────────────────────────

    /// create a new report. returns the created report with its assigned id.
    fn create_report(&self, report: &Report) -> impl Future<Output = Result<Report>> + Send;

    /// get a report by id.
    fn get_report(&self, id: ReportId) -> impl Future<Output = Result<Option<Report>>> + Send;

    /// list all reports.
    fn list_reports(&self) -> impl Future<Output = Result<Vec<Report>>> + Send;

    /// apply a partial update to a report.
    fn update_report(
        &self,
        id: ReportId,
        patch: &ReportPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete a report permanently. children keep their dangling parent id.
    fn delete_report(&self, id: ReportId) -> impl Future<Output = Result<()>> + Send;

    // ─── InvestigationOrder Operations ───────────────────────────────────────

    /// create a new investigation order.
    fn create_order(
        &self,
        order: &InvestigationOrder,
    ) -> impl Future<Output = Result<InvestigationOrder>> + Send;

    /// get an investigation order by id, with its parent report's name.
    fn get_order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<InvestigationOrder>>> + Send;

    /// list all investigation orders, with parent report names.
    fn list_orders(&self) -> impl Future<Output = Result<Vec<InvestigationOrder>>> + Send;

    /// list investigation orders belonging to a report.
    fn list_orders_for_report(
        &self,
        report_id: ReportId,
    ) -> impl Future<Output = Result<Vec<InvestigationOrder>>> + Send;

    /// apply a partial update to an investigation order.
    fn update_order(
        &self,
        id: OrderId,
        patch: &InvestigationOrderPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete an investigation order permanently.
    fn delete_order(&self, id: OrderId) -> impl Future<Output = Result<()>> + Send;

    // ─── Proceeding Operations ───────────────────────────────────────────────

    /// create a new proceeding.
    fn create_proceeding(
        &self,
        proceeding: &Proceeding,
    ) -> impl Future<Output = Result<Proceeding>> + Send;

    /// get a proceeding by id, with its parent order's title.
    fn get_proceeding(
        &self,
        id: ProceedingId,
    ) -> impl Future<Output = Result<Option<Proceeding>>> + Send;

    /// list all proceedings, with parent order titles.
    fn list_proceedings(&self) -> impl Future<Output = Result<Vec<Proceeding>>> + Send;

    /// list proceedings belonging to an investigation order.
    fn list_proceedings_for_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<Vec<Proceeding>>> + Send;

    /// apply a partial update to a proceeding.
    fn update_proceeding(
        &self,
        id: ProceedingId,
        patch: &ProceedingPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete a proceeding permanently.
    fn delete_proceeding(&self, id: ProceedingId) -> impl Future<Output = Result<()>> + Send;

    // ─── Asset Operations ────────────────────────────────────────────────────

    /// create a new asset.
    fn create_asset(&self, asset: &Asset) -> impl Future<Output = Result<Asset>> + Send;

    /// get an asset by id, with its parent proceeding's title.
    fn get_asset(&self, id: AssetId) -> impl Future<Output = Result<Option<Asset>>> + Send;

    /// list all assets, with parent proceeding titles.
    fn list_assets(&self) -> impl Future<Output = Result<Vec<Asset>>> + Send;

    /// list assets belonging to a proceeding.
    fn list_assets_for_proceeding(
        &self,
        proceeding_id: ProceedingId,
    ) -> impl Future<Output = Result<Vec<Asset>>> + Send;

    /// list assets in a category.
    fn list_assets_for_category(
        &self,
        category: AssetCategory,
    ) -> impl Future<Output = Result<Vec<Asset>>> + Send;

    /// apply a partial update to an asset.
    fn update_asset(
        &self,
        id: AssetId,
        patch: &AssetPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete an asset permanently.
    fn delete_asset(&self, id: AssetId) -> impl Future<Output = Result<()>> + Send;
}

/// the main database implementation using sea-orm.
#[derive(Clone)]
pub struct DocketDb {
    conn: DatabaseConnection,
}

impl DocketDb {
    /// create a new database connection from config.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let url = Self::build_connection_url(config)?;
        let conn: DatabaseConnection = SeaOrmDatabase::connect(&url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self { conn };

        // enable WAL mode for file-backed sqlite if configured
        if config.db_type == "sqlite" && config.write_ahead_log {
            db.enable_wal_mode().await?;
        }

        db.migrate().await?;
        Ok(db)
    }

    /// enable write-ahead logging mode for sqlite.
    ///
    /// WAL mode allows concurrent reads during writes. must be called
    /// before any writes.
    async fn enable_wal_mode(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;
        self.conn
            .execute_unprepared("PRAGMA journal_mode=WAL")
            .await
            .map_err(|e| Error::Connection(format!("failed to enable WAL mode: {}", e)))?;
        tracing::info!("sqlite WAL mode enabled");
        Ok(())
    }

    /// build a sea-orm compatible connection url from config.
    fn build_connection_url(config: &DatabaseConfig) -> Result<String> {
        match config.db_type.as_str() {
            "sqlite" => {
                let path = if config.connection_string.starts_with("sqlite:") {
                    config.connection_string.clone()
                } else {
                    format!("sqlite:{}", config.connection_string)
                };
                // add ?mode=rwc to create the file if it doesn't exist
                if path.contains('?') {
                    Ok(path)
                } else {
                    Ok(format!("{}?mode=rwc", path))
                }
            }
            "postgres" | "postgresql" => Ok(config.connection_string.clone()),
            other => Err(Error::InvalidData(format!(
                "unsupported database type: {}",
                other
            ))),
        }
    }

    /// create an in-memory sqlite database for testing.
    pub async fn new_in_memory() -> Result<Self> {
        let conn: DatabaseConnection = SeaOrmDatabase::connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self { conn };
        db.migrate().await?;
        Ok(db)
    }

    /// run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        migration::Migrator::up(&self.conn, None)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        Ok(())
    }
}

impl Database for DocketDb {
    // health check

    async fn ping(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(())
    }

    // user operations

    async fn create_user(&self, user: &User) -> Result<User> {
        let model: entity::user::ActiveModel = user.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let result = entity::user::Entity::find_by_id(id.0 as i64)
            .one(&self.conn)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = entity::user::Entity::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(&self.conn)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let results = entity::user::Entity::find().all(&self.conn).await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<()> {
        let mut update = entity::user::Entity::update_many();
        if let Some(ref username) = patch.username {
            update = update.col_expr(entity::user::Column::Username, Expr::value(username.clone()));
        }
        if let Some(ref password_hash) = patch.password_hash {
            update = update.col_expr(
                entity::user::Column::PasswordHash,
                Expr::value(password_hash.clone()),
            );
        }
        if let Some(role) = patch.role {
            update = update.col_expr(entity::user::Column::Role, Expr::value(role.as_str()));
        }
        update
            .col_expr(entity::user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::user::Column::Id.eq(id.0 as i64))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        entity::user::Entity::delete_by_id(id.0 as i64)
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    // report operations

    async fn create_report(&self, report: &Report) -> Result<Report> {
        let model: entity::report::ActiveModel = report.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
        let result = entity::report::Entity::find_by_id(id.0 as i64)
            .one(&self.conn)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let results = entity::report::Entity::find().all(&self.conn).await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update_report(&self, id: ReportId, patch: &ReportPatch) -> Result<()> {
        let mut update = entity::report::Entity::update_many();
        if let Some(ref name) = patch.name {
            update = update.col_expr(entity::report::Column::Name, Expr::value(name.clone()));
        }
        update
            .col_expr(entity::report::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::report::Column::Id.eq(id.0 as i64))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_report(&self, id: ReportId) -> Result<()> {
        entity::report::Entity::delete_by_id(id.0 as i64)
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    // investigation order operations

    async fn create_order(&self, order: &InvestigationOrder) -> Result<InvestigationOrder> {
        let model: entity::investigation_order::ActiveModel = order.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<InvestigationOrder>> {
        let result = entity::investigation_order::Entity::find_by_id(id.0 as i64)
            .find_also_related(entity::report::Entity)
            .one(&self.conn)
            .await?;
        Ok(result.map(|(m, r)| m.into_domain(r)))
    }

    async fn list_orders(&self) -> Result<Vec<InvestigationOrder>> {
        let results = entity::investigation_order::Entity::find()
            .find_also_related(entity::report::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, r)| m.into_domain(r)).collect())
    }

    async fn list_orders_for_report(&self, report_id: ReportId) -> Result<Vec<InvestigationOrder>> {
        let results = entity::investigation_order::Entity::find()
            .filter(entity::investigation_order::Column::ReportId.eq(report_id.0 as i64))
            .find_also_related(entity::report::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, r)| m.into_domain(r)).collect())
    }

    async fn update_order(&self, id: OrderId, patch: &InvestigationOrderPatch) -> Result<()> {
        let mut update = entity::investigation_order::Entity::update_many();
        if let Some(ref title) = patch.title {
            update = update.col_expr(
                entity::investigation_order::Column::Title,
                Expr::value(title.clone()),
            );
        }
        if let Some(ref description) = patch.description {
            update = update.col_expr(
                entity::investigation_order::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(report_id) = patch.report_id {
            update = update.col_expr(
                entity::investigation_order::Column::ReportId,
                Expr::value(report_id.0 as i64),
            );
        }
        if let Some(ref document_path) = patch.document_path {
            update = update.col_expr(
                entity::investigation_order::Column::DocumentPath,
                Expr::value(document_path.clone()),
            );
        }
        update
            .col_expr(
                entity::investigation_order::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::investigation_order::Column::Id.eq(id.0 as i64))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        entity::investigation_order::Entity::delete_by_id(id.0 as i64)
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    // proceeding operations

    async fn create_proceeding(&self, proceeding: &Proceeding) -> Result<Proceeding> {
        let model: entity::proceeding::ActiveModel = proceeding.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_proceeding(&self, id: ProceedingId) -> Result<Option<Proceeding>> {
        let result = entity::proceeding::Entity::find_by_id(id.0 as i64)
            .find_also_related(entity::investigation_order::Entity)
            .one(&self.conn)
            .await?;
        Ok(result.map(|(m, o)| m.into_domain(o)))
    }

    async fn list_proceedings(&self) -> Result<Vec<Proceeding>> {
        let results = entity::proceeding::Entity::find()
            .find_also_related(entity::investigation_order::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, o)| m.into_domain(o)).collect())
    }

    async fn list_proceedings_for_order(&self, order_id: OrderId) -> Result<Vec<Proceeding>> {
        let results = entity::proceeding::Entity::find()
            .filter(entity::proceeding::Column::OrderId.eq(order_id.0 as i64))
            .find_also_related(entity::investigation_order::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, o)| m.into_domain(o)).collect())
    }

    async fn update_proceeding(&self, id: ProceedingId, patch: &ProceedingPatch) -> Result<()> {
        let mut update = entity::proceeding::Entity::update_many();
        if let Some(ref title) = patch.title {
            update = update.col_expr(
                entity::proceeding::Column::Title,
                Expr::value(title.clone()),
            );
        }
        if let Some(ref description) = patch.description {
            update = update.col_expr(
                entity::proceeding::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(order_id) = patch.order_id {
            update = update.col_expr(
                entity::proceeding::Column::OrderId,
                Expr::value(order_id.0 as i64),
            );
        }
        if let Some(ref document_path) = patch.document_path {
            update = update.col_expr(
                entity::proceeding::Column::DocumentPath,
                Expr::value(document_path.clone()),
            );
        }
        update
            .col_expr(
                entity::proceeding::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(entity::proceeding::Column::Id.eq(id.0 as i64))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_proceeding(&self, id: ProceedingId) -> Result<()> {
        entity::proceeding::Entity::delete_by_id(id.0 as i64)
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    // asset operations

    async fn create_asset(&self, asset: &Asset) -> Result<Asset> {
        let model: entity::asset::ActiveModel = asset.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>> {
        let result = entity::asset::Entity::find_by_id(id.0 as i64)
            .find_also_related(entity::proceeding::Entity)
            .one(&self.conn)
            .await?;
        Ok(result.map(|(m, p)| m.into_domain(p)))
    }

    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let results = entity::asset::Entity::find()
            .find_also_related(entity::proceeding::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, p)| m.into_domain(p)).collect())
    }

    async fn list_assets_for_proceeding(&self, proceeding_id: ProceedingId) -> Result<Vec<Asset>> {
        let results = entity::asset::Entity::find()
            .filter(entity::asset::Column::ProceedingId.eq(proceeding_id.0 as i64))
            .find_also_related(entity::proceeding::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, p)| m.into_domain(p)).collect())
    }

    async fn list_assets_for_category(&self, category: AssetCategory) -> Result<Vec<Asset>> {
        let results = entity::asset::Entity::find()
            .filter(entity::asset::Column::Category.eq(category.as_str()))
            .find_also_related(entity::proceeding::Entity)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|(m, p)| m.into_domain(p)).collect())
    }

    async fn update_asset(&self, id: AssetId, patch: &AssetPatch) -> Result<()> {
        let mut update = entity::asset::Entity::update_many();
        if let Some(ref title) = patch.title {
            update = update.col_expr(entity::asset::Column::Title, Expr::value(title.clone()));
        }
        if let Some(category) = patch.category {
            update = update.col_expr(
                entity::asset::Column::Category,
                Expr::value(category.as_str()),
            );
        }
        if let Some(ref description) = patch.description {
            update = update.col_expr(
                entity::asset::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(proceeding_id) = patch.proceeding_id {
            update = update.col_expr(
                entity::asset::Column::ProceedingId,
                Expr::value(proceeding_id.0 as i64),
            );
        }
        if let Some(ref document_path) = patch.document_path {
            update = update.col_expr(
                entity::asset::Column::DocumentPath,
                Expr::value(document_path.clone()),
            );
        }
        update
            .col_expr(entity::asset::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::asset::Column::Id.eq(id.0 as i64))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    async fn delete_asset(&self, id: AssetId) -> Result<()> {
        entity::asset::Entity::delete_by_id(id.0 as i64)
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
