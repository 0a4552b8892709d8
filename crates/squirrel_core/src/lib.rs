//! Core domain logic for the squirrel service.
//!
//! Holds the SQLite-backed squirrel repository consumed by the HTTP server,
//! and the unrelated flat-file `ListStore`.

pub mod db;
pub mod list_store;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use list_store::{ListStore, ListStoreError, ListStoreResult, StringListStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::squirrel::{InvalidSquirrelId, NewSquirrel, Squirrel, SquirrelId};
pub use repo::squirrel_repo::{
    RepoError, RepoResult, SqliteSquirrelRepository, SquirrelRepository,
};
pub use service::squirrel_service::SquirrelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
