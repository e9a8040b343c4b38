//! http handlers for docket api endpoints.

pub mod assets;
pub mod auth;
mod error;
pub mod files;
mod health;
pub mod orders;
pub mod proceedings;
pub mod reports;
mod upload;
pub mod users;

pub use auth::{SessionContext, ADMIN_ONLY, SESSION_COOKIE};
pub use error::ApiError;
pub use health::health;

/// build the absolute attachment url from the stored relative path.
/// presentation convenience only; nothing derived from it is persisted.
pub(crate) fn document_url(base_url: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{}/files/{}", base_url.trim_end_matches('/'), p))
}
