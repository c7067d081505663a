//! Core catalog logic for Magpress: authors write articles, articles belong
//! to magazines. This crate is the single source of truth for the catalog
//! invariants.

pub mod db;
pub mod entity;
pub mod logging;
pub mod model;

pub use db::{create_tables, recreate_schema, DbError, DbResult, Store};
pub use entity::article::{Article, NewArticle};
pub use entity::author::Author;
pub use entity::magazine::Magazine;
pub use entity::{EntityError, EntityResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::records::{
    ArticleRecord, ArticleRow, AuthorRecord, MagazineArticleRow, MagazineRecord,
};
pub use model::validation::ValidationError;
pub use model::{ArticleId, AuthorId, MagazineId};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
