//! Record-with-behavior wrappers over the catalog tables.
//!
//! # Responsibility
//! - Create, load and update authors, magazines and articles.
//! - Validate caller input before any SQL mutation.
//! - Expose relationship reads across the `articles` join table.
//!
//! # Invariants
//! - Entities reach SQL only through [`crate::db::Store::with_connection`].
//! - `Validation` and `NotFound` are never swallowed; relationship reads
//!   propagate storage failures instead of returning empty results.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod author;
pub mod magazine;

pub type EntityResult<T> = Result<T, EntityError>;

/// Error returned by entity operations.
#[derive(Debug)]
pub enum EntityError {
    /// Caller-supplied data violates a documented constraint.
    Validation(ValidationError),
    /// Lookup by id yielded no row.
    NotFound { entity: &'static str, id: i64 },
    /// Engine-level failure: connectivity or a constraint not pre-validated.
    Storage(DbError),
}

impl EntityError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for EntityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} with id {id} not found"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for EntityError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for EntityError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for EntityError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}
