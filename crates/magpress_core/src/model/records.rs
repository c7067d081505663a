//! Plain data shapes returned to callers.

use super::{ArticleId, AuthorId, MagazineId};
use serde::{Deserialize, Serialize};

/// Snapshot of one author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: AuthorId,
    pub name: String,
}

/// Snapshot of one magazine row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineRecord {
    pub id: MagazineId,
    pub name: String,
    pub category: String,
}

/// Snapshot of one article row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author_id: AuthorId,
    pub magazine_id: MagazineId,
}

/// Article projection returned by `Author::articles`.
///
/// Raw row data, not a hydrated `Article`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRow {
    pub title: String,
    pub content: String,
    pub author_id: AuthorId,
    pub magazine_id: MagazineId,
}

/// Article projection returned by `Magazine::articles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineArticleRow {
    pub title: String,
    pub content: String,
    pub author_id: AuthorId,
}
