//! Squirrel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `squirrels` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every mutation is a single statement, committed before returning.
//! - Read paths reject invalid persisted ids instead of masking them.
//! - Listing order is `id` ascending, which is also insertion order.

use crate::db::DbError;
use crate::model::squirrel::{NewSquirrel, Squirrel, SquirrelId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SQUIRREL_SELECT_SQL: &str = "SELECT id, name, size FROM squirrels";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for squirrel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(SquirrelId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "squirrel not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted squirrel data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for squirrel CRUD operations.
pub trait SquirrelRepository {
    /// Inserts a record and returns it with its storage-assigned id.
    fn create_squirrel(&self, squirrel: &NewSquirrel) -> RepoResult<Squirrel>;
    fn get_squirrel(&self, id: SquirrelId) -> RepoResult<Option<Squirrel>>;
    fn list_squirrels(&self) -> RepoResult<Vec<Squirrel>>;
    /// Replaces `name` and `size`; fails with `NotFound` when no row matches.
    fn update_squirrel(&self, id: SquirrelId, squirrel: &NewSquirrel) -> RepoResult<()>;
    /// Hard-deletes the row; fails with `NotFound` when no row matches.
    fn delete_squirrel(&self, id: SquirrelId) -> RepoResult<()>;
}

/// SQLite-backed squirrel repository over a borrowed connection.
pub struct SqliteSquirrelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSquirrelRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SquirrelRepository for SqliteSquirrelRepository<'_> {
    fn create_squirrel(&self, squirrel: &NewSquirrel) -> RepoResult<Squirrel> {
        self.conn.execute(
            "INSERT INTO squirrels (name, size) VALUES (?1, ?2);",
            params![squirrel.name.as_str(), squirrel.size.as_str()],
        )?;

        let id = parse_row_id(self.conn.last_insert_rowid())?;
        Ok(squirrel.clone().with_id(id))
    }

    fn get_squirrel(&self, id: SquirrelId) -> RepoResult<Option<Squirrel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SQUIRREL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_squirrel_row(row)?));
        }

        Ok(None)
    }

    fn list_squirrels(&self) -> RepoResult<Vec<Squirrel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SQUIRREL_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut squirrels = Vec::new();

        while let Some(row) = rows.next()? {
            squirrels.push(parse_squirrel_row(row)?);
        }

        Ok(squirrels)
    }

    fn update_squirrel(&self, id: SquirrelId, squirrel: &NewSquirrel) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE squirrels SET name = ?1, size = ?2 WHERE id = ?3;",
            params![squirrel.name.as_str(), squirrel.size.as_str(), id.get()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_squirrel(&self, id: SquirrelId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM squirrels WHERE id = ?1;", [id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_squirrel_row(row: &Row<'_>) -> RepoResult<Squirrel> {
    let id = parse_row_id(row.get("id")?)?;
    Ok(Squirrel {
        id,
        name: row.get("name")?,
        size: row.get("size")?,
    })
}

fn parse_row_id(raw: i64) -> RepoResult<SquirrelId> {
    SquirrelId::new(raw)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{raw}` in squirrels.id")))
}
