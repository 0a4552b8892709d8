//! Shared handler state.

use crate::error::ApiError;
use rusqlite::Connection;
use squirrel_core::{RepoResult, SqliteSquirrelRepository, SquirrelService};
use std::sync::{Arc, Mutex};

/// One SQLite connection shared by all requests.
///
/// Each request holds the lock only for its own statements; the guard never
/// lives across an `.await`.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection that already has migrations applied (see `squirrel_core::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` against a service bound to the locked connection.
    pub fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: for<'c> FnOnce(&SquirrelService<SqliteSquirrelRepository<'c>>) -> RepoResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::Internal("squirrel connection lock poisoned".to_string()))?;
        let service = SquirrelService::new(SqliteSquirrelRepository::new(&conn));
        Ok(op(&service)?)
    }
}
