//! Server configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honored through `dotenvy`;
//! real environment variables take precedence.

use squirrel_core::default_log_level;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "SQUIRREL_BIND_ADDR";
pub const DB_PATH_VAR: &str = "SQUIRREL_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "SQUIRREL_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SQUIRREL_LOG_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DB_PATH: &str = "squirrel_db.db";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SQUIRREL_BIND_ADDR `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Always absolute; relative values are resolved against the working directory.
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_text = read(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_text
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_text.clone(),
                source,
            })?;

        let log_dir = read(LOG_DIR_VAR).unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(read(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: absolutize(Path::new(&log_dir))?,
        })
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
