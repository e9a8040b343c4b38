//! cli subcommands for docket.
//!
//! - `docket serve` - Run the records server
//! - `docket users create` - Create a user (bootstraps the first administrator)
//! - `docket users list` - List users
//! - `docket users delete` - Delete a user

mod serve;
mod users;

pub use serve::ServeCommand;
pub use users::UsersCommand;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};

use docket_db::DocketDb;
use docket_types::{Config, DatabaseConfig};

/// docket - evidence records server
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(about = "Evidence records server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// run the records server
    Serve(ServeCommand),

    /// manage users
    #[command(subcommand)]
    Users(UsersCommand),
}

/// default config file search paths (in order of priority).
const CONFIG_SEARCH_PATHS: &[&str] = &["/etc/docket/config.toml", "./config.toml"];

/// find and load a config file, returning none if no config file is found.
pub(crate) fn load_config_file(config_path: Option<&PathBuf>) -> Result<Option<Config>> {
    // if an explicit path is provided, it must exist
    if let Some(path) = config_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {:?}", path))?;
        return Ok(Some(config));
    }

    // search default paths
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file: {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse config file: {:?}", path))?;
            return Ok(Some(config));
        }
    }

    Ok(None)
}

/// parse a database url into a database config.
pub(crate) fn parse_database_url(db_url: &str) -> Result<DatabaseConfig> {
    if db_url.starts_with("postgres://") || db_url.starts_with("postgresql://") {
        return Ok(DatabaseConfig {
            db_type: "postgres".to_string(),
            connection_string: db_url.to_string(),
            write_ahead_log: false,
        });
    }

    // bare paths and sqlite: urls are sqlite
    let path = db_url.strip_prefix("sqlite://").unwrap_or(db_url);
    Ok(DatabaseConfig {
        db_type: "sqlite".to_string(),
        connection_string: path.to_string(),
        ..DatabaseConfig::default()
    })
}

/// shared database connection arguments for admin subcommands.
#[derive(Args, Debug)]
pub struct DbArgs {
    /// path to config file (toml format)
    #[arg(short, long, env = "DOCKET_CONFIG")]
    config: Option<PathBuf>,

    /// database url (sqlite:// or postgres://)
    #[arg(long, env = "DOCKET_DATABASE_URL")]
    database_url: Option<String>,
}

impl DbArgs {
    /// resolve the database config and connect.
    pub async fn connect(&self) -> Result<DocketDb> {
        let mut database = load_config_file(self.config.as_ref())?
            .map(|config| config.database)
            .unwrap_or_default();
        if let Some(ref db_url) = self.database_url {
            database = parse_database_url(db_url)?;
        }

        DocketDb::new(&database)
            .await
            .context("failed to connect to database")
    }
}
