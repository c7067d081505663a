//! Explicit storage capability handed to every entity.
//!
//! # Responsibility
//! - Decide where connections come from (database file or a held connection).
//! - Scope each entity operation to exactly one borrowed connection.
//!
//! # Invariants
//! - File-backed stores open a fresh connection per operation and drop it
//!   before returning, on success and on error alike.
//! - Statements run in autocommit mode; a mutating operation is committed by
//!   the time `with_connection` returns.

use super::open::{connect, open_db, open_db_in_memory};
use super::{DbError, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Storage access handle shared by `Author`, `Magazine` and `Article`.
#[derive(Debug)]
pub struct Store {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    /// Connect per operation to a migrated database file.
    File(PathBuf),
    /// Externally scoped connection lent to every operation.
    Held(Connection),
}

impl Store {
    /// Opens a file-backed store, creating and migrating the database if needed.
    ///
    /// The bootstrap connection is closed before this returns.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        drop(open_db(&path)?);
        Ok(Self {
            backend: Backend::File(path),
        })
    }

    /// Opens a migrated in-memory store backed by one held connection.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            backend: Backend::Held(open_db_in_memory()?),
        })
    }

    /// Wraps a caller-owned connection.
    ///
    /// The connection is used as-is: callers are responsible for enabling
    /// foreign keys and migrating it (see [`super::open_db`]).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            backend: Backend::Held(conn),
        }
    }

    /// Returns the database file path for file-backed stores.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path.as_path()),
            Backend::Held(_) => None,
        }
    }

    /// Runs `op` with a connection scoped to this call.
    ///
    /// # Errors
    /// - Returns the connect failure (converted into `E`) for file-backed
    ///   stores that cannot be opened.
    /// - Returns whatever `op` returns otherwise.
    pub fn with_connection<T, E>(&self, op: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        match &self.backend {
            Backend::File(path) => {
                let conn = connect(path)?;
                op(&conn)
            }
            Backend::Held(conn) => op(conn),
        }
    }
}
