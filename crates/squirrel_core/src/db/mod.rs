//! SQLite bootstrap for the squirrel table.
//!
//! # Responsibility
//! - Open the connection backing `squirrels` and bring its schema up to date.
//! - Report which database could not be opened, not just why.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Repositories only ever see connections returned by `open_db*`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying the squirrel database.
#[derive(Debug)]
pub enum DbError {
    /// The connection itself could not be established; `target` is the file
    /// path or `:memory:`.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// A statement failed on an open connection.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build; refusing to touch it.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
}

impl DbError {
    pub(crate) fn open(target: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Open {
            target: target.into(),
            source,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open squirrel database `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "squirrel database statement failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "squirrel database is at schema v{db_version}, this build only knows up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
