//! Storage access for the magazine catalog.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Own the schema (migrations, destructive setup).
//! - Lend connections to entities through [`Store`].
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON`.
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Entities never hold a connection across calls.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod setup;
mod store;

pub use open::{connect, open_db, open_db_in_memory};
pub use setup::{create_tables, recreate_schema};
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

/// Failure reaching or preparing the catalog database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement. Constraint violations land here too.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build whose schema this one cannot read.
    SchemaTooNew { found: u32, supported: u32 },
    /// A catalog migration failed; the whole upgrade was rolled back.
    Migration { version: u32, source: rusqlite::Error },
}

impl DbError {
    /// `UNIQUE`, `CHECK`, `NOT NULL` or `FOREIGN KEY` rejected a write.
    pub fn is_constraint_violation(&self) -> bool {
        let err = match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => err,
            Self::SchemaTooNew { .. } => return false,
        };
        err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "catalog query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "catalog schema v{found} was written by a newer build (this build reads up to v{supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "catalog migration v{version} failed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
