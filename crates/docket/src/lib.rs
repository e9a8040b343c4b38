//! docket library - HTTP handlers and application setup.
//!
//! this crate provides the http server and record services for the
//! docket evidence-records system:
//! - [`handlers`]: http request handlers per resource
//! - [`service`]: record services (validation, parent checks, attachment lifecycle)
//! - [`attachments`]: attachment storage under the upload root
//! - [`session`]: server-side session store
//! - [`cli`]: command-line interface implementation

#![warn(missing_docs)]

pub mod attachments;
pub mod cli;
pub mod handlers;
pub mod service;
pub mod session;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};

use docket_db::DocketDb;
use docket_types::Config;

use attachments::AttachmentStore;
use session::SessionStore;

/// maximum request body size. slightly above the attachment bound so
/// the attachment store's 10 MiB check answers oversized uploads with a
/// distinct rejection instead of the transport default.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// database connection for persistent storage.
    pub db: DocketDb,
    /// server configuration.
    pub config: Config,
    /// server-side session store.
    pub sessions: SessionStore,
    /// attachment storage under the upload root.
    pub attachments: AttachmentStore,
}

/// root banner handler.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "docket",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// create the axum application with all routes.
///
/// creates the attachment root and its category subdirectories if
/// absent.
pub async fn create_app(
    db: DocketDb,
    config: Config,
) -> Result<Router, attachments::AttachmentError> {
    let attachments = AttachmentStore::new(config.uploads.path.clone());
    attachments.init().await?;

    let sessions = SessionStore::new(config.session.ttl_secs);

    let state = AppState {
        db,
        config,
        sessions,
        attachments,
    };

    Ok(Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health))
        .nest("/api/users", handlers::users::router())
        .nest("/api/reports", handlers::reports::router())
        .nest("/api/orders", handlers::orders::router())
        .nest("/api/proceedings", handlers::proceedings::router())
        .nest("/api/assets", handlers::assets::router())
        .nest("/files", handlers::files::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state))
}
