use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::application::{LoginInput, SnapshotMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid VREPORT_SNAPSHOT_MODE: {0} (expected reconcile or accumulate)")]
    SnapshotMode(String),
}

/// Database path that selects the in-memory snapshot store
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub snapshot_mode: SnapshotMode,
    pub log_level: String,
    pub vcenter_server: Option<String>,
    pub vcenter_user: Option<String>,
    pub vcenter_password: Option<String>,
    pub vcenter_insecure: bool,
}

impl Config {
    /// Read configuration from the environment. An unrecognised snapshot
    /// mode is an error, not a fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env::var("VREPORT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            db_path: env::var("VREPORT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("vcache.db")),
            snapshot_mode: parse_snapshot_mode(env::var("VREPORT_SNAPSHOT_MODE").ok())?,
            log_level: env::var("VREPORT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            vcenter_server: env::var("VCENTER_SERVER").ok(),
            vcenter_user: env::var("VCENTER_USER").ok(),
            vcenter_password: env::var("VCENTER_PASSWORD").ok(),
            vcenter_insecure: env::var("VCENTER_INSECURE")
                .ok()
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
        })
    }

    /// Whether snapshots live only in memory
    pub fn in_memory(&self) -> bool {
        self.db_path.as_os_str() == MEMORY_DB_PATH
    }

    /// Credentials a login request falls back to
    pub fn login_defaults(&self) -> LoginInput {
        LoginInput {
            server: self.vcenter_server.clone(),
            username: self.vcenter_user.clone(),
            password: self.vcenter_password.clone(),
        }
    }
}

fn parse_snapshot_mode(value: Option<String>) -> Result<SnapshotMode, ConfigError> {
    match value {
        None => Ok(SnapshotMode::default()),
        Some(s) if s.trim().is_empty() => Ok(SnapshotMode::default()),
        Some(s) => s.trim().parse().map_err(ConfigError::SnapshotMode),
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("snapshot_mode", &self.snapshot_mode)
            .field("log_level", &self.log_level)
            .field("vcenter_server", &self.vcenter_server)
            .field("vcenter_user", &self.vcenter_user)
            .field(
                "vcenter_password",
                &self.vcenter_password.as_ref().map(|_| "<redacted>"),
            )
            .field("vcenter_insecure", &self.vcenter_insecure)
            .finish()
    }
}
