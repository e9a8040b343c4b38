//! user entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};
use tracing::warn;

use docket_types::{Role, User, UserId};

/// user database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    /// role stored as its string form ("administrator" / "viewer").
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        let role = model.role.parse().unwrap_or_else(|_| {
            warn!(user_id = model.id, role = %model.role, "unknown role in database, treating as viewer");
            Role::Viewer
        });

        User {
            id: UserId(model.id as u64),
            username: model.username,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: if user.id.0 == 0 {
                NotSet
            } else {
                Set(user.id.0 as i64)
            },
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_string()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
