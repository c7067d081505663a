//! Field validation and normalization rules.
//!
//! # Invariants
//! - Author names, article titles and article content are trimmed before
//!   they are checked and stored.
//! - Magazine names and categories are stored exactly as given.
//! - Lengths count Unicode scalar values, the same unit SQLite `length()`
//!   uses for TEXT columns. SQLite stops counting at the first NUL, so
//!   titles (the one field with a schema length `CHECK`) reject NUL.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Allowed magazine name length, in characters.
pub const MAGAZINE_NAME_CHARS: RangeInclusive<usize> = 2..=16;
/// Allowed article title length after trimming, in characters.
pub const TITLE_CHARS: RangeInclusive<usize> = 5..=50;

/// Caller-supplied data violates a catalog constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is zero or negative.
    NonPositiveId { field: &'static str, value: i64 },
    /// Author name is empty after trimming.
    EmptyAuthorName,
    /// Magazine name length is outside `MAGAZINE_NAME_CHARS`.
    MagazineNameLength { chars: usize },
    /// Magazine category is empty.
    EmptyCategory,
    /// Trimmed article title length is outside `TITLE_CHARS`.
    TitleLength { chars: usize },
    /// Length-checked field contains a NUL character.
    ContainsNul(&'static str),
    /// Article content is empty after trimming.
    EmptyContent,
    /// A field required for creation was not supplied.
    MissingField(&'static str),
    /// Neither an id nor the creation fields were supplied.
    MissingIdentity(&'static str),
    /// Article references an author id with no row.
    MissingAuthor(i64),
    /// Article references a magazine id with no row.
    MissingMagazine(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId { field, value } => {
                write!(f, "{field} must be a positive integer, got {value}")
            }
            Self::EmptyAuthorName => write!(f, "author name must be a non-empty string"),
            Self::MagazineNameLength { chars } => write!(
                f,
                "magazine name must be {}-{} characters, got {chars}",
                MAGAZINE_NAME_CHARS.start(),
                MAGAZINE_NAME_CHARS.end()
            ),
            Self::EmptyCategory => write!(f, "magazine category must be a non-empty string"),
            Self::TitleLength { chars } => write!(
                f,
                "article title must be {}-{} characters, got {chars}",
                TITLE_CHARS.start(),
                TITLE_CHARS.end()
            ),
            Self::ContainsNul(field) => write!(f, "{field} must not contain NUL characters"),
            Self::EmptyContent => write!(f, "article content must be a non-empty string"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::MissingIdentity(entity) => write!(
                f,
                "either an id or the creation fields must be provided for {entity}"
            ),
            Self::MissingAuthor(id) => write!(f, "author with id {id} does not exist"),
            Self::MissingMagazine(id) => write!(f, "magazine with id {id} does not exist"),
        }
    }
}

impl Error for ValidationError {}

/// Accepts strictly positive row ids.
pub fn validate_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveId { field, value })
    }
}

/// Trims an author name and rejects blank values.
pub fn normalize_author_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAuthorName);
    }
    Ok(trimmed.to_string())
}

/// Checks magazine name length without trimming.
pub fn validate_magazine_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if !MAGAZINE_NAME_CHARS.contains(&chars) {
        return Err(ValidationError::MagazineNameLength { chars });
    }
    Ok(())
}

/// Rejects an empty category. Whitespace-only categories are accepted.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(())
}

/// Trims an article title and checks its length.
pub fn normalize_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.contains('\0') {
        return Err(ValidationError::ContainsNul("article title"));
    }
    let chars = trimmed.chars().count();
    if !TITLE_CHARS.contains(&chars) {
        return Err(ValidationError::TitleLength { chars });
    }
    Ok(trimmed.to_string())
}

/// Trims article content and rejects blank values.
pub fn normalize_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(trimmed.to_string())
}
