//! Catalog domain model.
//!
//! # Responsibility
//! - Name the identifiers shared by authors, magazines and articles.
//! - Own the field validation rules applied before any write.
//! - Define the serializable records and row projections read back from storage.
//!
//! # Invariants
//! - Validation here mirrors the schema `CHECK` constraints, so a value that
//!   passes validation is never rejected by a `CHECK`. Titles with NUL are
//!   refused because SQLite `length()` truncates at the first NUL.

pub mod records;
pub mod validation;

/// Row id of an `authors` record.
pub type AuthorId = i64;
/// Row id of a `magazines` record.
pub type MagazineId = i64;
/// Row id of an `articles` record.
pub type ArticleId = i64;
