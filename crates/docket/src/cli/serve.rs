//! the `serve` subcommand - runs the records server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use docket_db::DocketDb;
use docket_types::Config;

use super::{load_config_file, parse_database_url};

/// run the docket records server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// path to config file (toml format)
    #[arg(short, long, env = "DOCKET_CONFIG")]
    config: Option<PathBuf>,

    /// database url (sqlite:// or postgres://)
    #[arg(long, env = "DOCKET_DATABASE_URL")]
    database_url: Option<String>,

    /// address to listen on
    #[arg(long, env = "DOCKET_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// externally visible base url (for attachment links)
    #[arg(long, env = "DOCKET_SERVER_URL")]
    server_url: Option<String>,

    /// attachment root directory
    #[arg(long, env = "DOCKET_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// log level
    #[arg(long, env = "DOCKET_LOG_LEVEL")]
    log_level: Option<String>,
}

impl ServeCommand {
    /// convert cli arguments into a config struct, merging with the
    /// config file if present.
    ///
    /// priority order: defaults -> config file -> cli flags
    fn into_config(self) -> Result<Config> {
        let mut config = match load_config_file(self.config.as_ref())? {
            Some(file_config) => {
                info!("Loaded configuration from file");
                file_config
            }
            None => Config::default(),
        };

        // cli overrides (only if explicitly set)
        if let Some(db_url) = self.database_url {
            config.database = parse_database_url(&db_url)?;
        }
        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }
        if let Some(server_url) = self.server_url {
            config.server_url = server_url;
        }
        if let Some(upload_dir) = self.upload_dir {
            config.uploads.path = upload_dir;
        }

        Ok(config)
    }

    /// run the serve command
    pub async fn run(self) -> Result<()> {
        // initialize logging (use CLI override or default to info)
        let log_level_str = self.log_level.clone().unwrap_or_else(|| "info".to_string());
        let log_level = match log_level_str.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        info!("Starting docket...");

        let config = self.into_config()?;
        info!("Database: {}", config.database.connection_string);
        info!("Listen address: {}", config.listen_addr);
        info!("Server URL: {}", config.server_url);
        info!("Upload directory: {:?}", config.uploads.path);

        // ensure parent directory exists for sqlite databases
        if config.database.db_type == "sqlite" {
            let db_path = std::path::Path::new(&config.database.connection_string);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    info!("Creating database directory: {:?}", parent);
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory: {:?}", parent)
                    })?;
                }
            }
        }

        // initialize database (runs migrations)
        let db = DocketDb::new(&config.database)
            .await
            .context("failed to initialize database")?;
        info!("Database initialized successfully");

        let addr: SocketAddr = config
            .listen_addr
            .parse()
            .context("invalid listen address")?;

        let app = crate::create_app(db, config)
            .await
            .context("failed to create attachment directories")?;

        info!("Starting HTTP server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        Ok(())
    }
}

/// resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install SIGINT handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
