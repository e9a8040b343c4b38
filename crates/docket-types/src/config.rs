//! configuration types for docket.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// main configuration for docket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// externally visible base url, used to build attachment links.
    pub server_url: String,

    /// address to bind the http server to.
    pub listen_addr: String,

    /// database configuration.
    pub database: DatabaseConfig,

    /// attachment storage configuration.
    pub uploads: UploadConfig,

    /// session configuration.
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            database: DatabaseConfig::default(),
            uploads: UploadConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// database type: "sqlite" or "postgres".
    pub db_type: String,

    /// database connection string or file path.
    pub connection_string: String,

    /// enable write-ahead logging for file-backed sqlite.
    pub write_ahead_log: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: "sqlite".to_string(),
            connection_string: "/var/lib/docket/db.sqlite".to_string(),
            write_ahead_log: true,
        }
    }
}

/// attachment storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// attachment root directory. category subdirectories are created
    /// under it at startup.
    pub path: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/docket/uploads"),
        }
    }
}

/// session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// session lifetime in seconds. sessions older than this are treated
    /// as unauthenticated.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // one day
            ttl_secs: 24 * 60 * 60,
        }
    }
}
