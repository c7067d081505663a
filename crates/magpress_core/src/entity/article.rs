//! Article entity.
//!
//! # Responsibility
//! - Create articles after checking the referenced author and magazine exist.
//! - Load articles by id and edit their content.
//! - Resolve the current author and magazine of an article.
//!
//! # Invariants
//! - Title, author and magazine are fixed after creation; only content changes.
//! - Title and content are stored trimmed.
//! - Creation is three independently committed steps (author lookup,
//!   magazine lookup, insert), not one transaction.

use crate::db::Store;
use crate::entity::author::Author;
use crate::entity::magazine::Magazine;
use crate::entity::{EntityError, EntityResult};
use crate::model::records::ArticleRecord;
use crate::model::validation::{normalize_content, normalize_title, validate_id, ValidationError};
use crate::model::{ArticleId, AuthorId, MagazineId};
use log::info;
use rusqlite::{params, OptionalExtension, Row};
use std::fmt::{Display, Formatter};

const ENTITY: &str = "article";

/// Creation input for [`Article::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author_id: AuthorId,
    pub magazine_id: MagazineId,
}

/// A piece of content written by one author for one magazine.
#[derive(Debug)]
pub struct Article<'s> {
    store: &'s Store,
    id: ArticleId,
    title: String,
    content: String,
    author_id: AuthorId,
    magazine_id: MagazineId,
}

impl<'s> Article<'s> {
    /// Loads by `id` when given; otherwise every creation field is required.
    ///
    /// # Errors
    /// - `Validation(MissingField)` naming the first absent creation field.
    /// - Errors from [`Self::get`] or [`Self::create`] otherwise.
    pub fn construct(
        store: &'s Store,
        id: Option<ArticleId>,
        title: Option<&str>,
        content: Option<&str>,
        author_id: Option<AuthorId>,
        magazine_id: Option<MagazineId>,
    ) -> EntityResult<Self> {
        if let Some(id) = id {
            return Self::get(store, id);
        }

        let fields = NewArticle {
            title: title.ok_or(ValidationError::MissingField("title"))?,
            content: content.ok_or(ValidationError::MissingField("content"))?,
            author_id: author_id.ok_or(ValidationError::MissingField("author_id"))?,
            magazine_id: magazine_id.ok_or(ValidationError::MissingField("magazine_id"))?,
        };
        Self::create(store, &fields)
    }

    /// Loads an article by id.
    ///
    /// # Errors
    /// - `Validation` when `id` is not positive.
    /// - `NotFound` when no row has this id.
    pub fn get(store: &'s Store, id: ArticleId) -> EntityResult<Self> {
        let id = validate_id("article id", id)?;
        let article = store.with_connection(|conn| -> EntityResult<Option<Self>> {
            Ok(conn
                .query_row(
                    "SELECT id, title, content, author_id, magazine_id
                     FROM articles
                     WHERE id = ?1;",
                    [id],
                    |row| parse_article_row(store, row),
                )
                .optional()?)
        })?;

        article.ok_or_else(|| EntityError::not_found(ENTITY, id))
    }

    /// Validates `fields`, checks the references exist and inserts the article.
    ///
    /// # Errors
    /// - `Validation` for a bad title, blank content or non-positive ids.
    /// - `Validation(MissingAuthor | MissingMagazine)` when a referenced row is
    ///   absent.
    /// - `Storage` for engine failures.
    pub fn create(store: &'s Store, fields: &NewArticle<'_>) -> EntityResult<Self> {
        let title = normalize_title(fields.title)?;
        let content = normalize_content(fields.content)?;
        let author_id = validate_id("author id", fields.author_id)?;
        let magazine_id = validate_id("magazine id", fields.magazine_id)?;

        Author::get(store, author_id).map_err(|err| match err {
            EntityError::NotFound { .. } => ValidationError::MissingAuthor(author_id).into(),
            other => other,
        })?;
        Magazine::get(store, magazine_id).map_err(|err| match err {
            EntityError::NotFound { .. } => ValidationError::MissingMagazine(magazine_id).into(),
            other => other,
        })?;

        let id = store.with_connection(|conn| -> EntityResult<ArticleId> {
            conn.execute(
                "INSERT INTO articles (title, content, author_id, magazine_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![title.as_str(), content.as_str(), author_id, magazine_id],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        info!(
            "event=article_create module=entity status=ok id={id} author_id={author_id} magazine_id={magazine_id}"
        );
        Ok(Self {
            store,
            id,
            title,
            content,
            author_id,
            magazine_id,
        })
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    pub fn magazine_id(&self) -> MagazineId {
        self.magazine_id
    }

    /// Replaces the content with its trimmed form.
    ///
    /// On any error the stored and cached content are left unchanged.
    pub fn set_content(&mut self, new_content: &str) -> EntityResult<()> {
        let new_content = normalize_content(new_content)?;
        let id = self.id;
        let changed = self.store.with_connection(|conn| {
            conn.execute(
                "UPDATE articles SET content = ?1 WHERE id = ?2;",
                params![new_content.as_str(), id],
            )
            .map_err(EntityError::from)
        })?;
        if changed == 0 {
            return Err(EntityError::not_found(ENTITY, id));
        }

        self.content = new_content;
        Ok(())
    }

    /// Current author row. Queried on every call.
    pub fn author(&self) -> EntityResult<Author<'s>> {
        Author::get(self.store, self.author_id)
    }

    /// Current magazine row. Queried on every call.
    pub fn magazine(&self) -> EntityResult<Magazine<'s>> {
        Magazine::get(self.store, self.magazine_id)
    }

    pub fn to_record(&self) -> ArticleRecord {
        ArticleRecord {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author_id: self.author_id,
            magazine_id: self.magazine_id,
        }
    }
}

fn parse_article_row<'s>(store: &'s Store, row: &Row<'_>) -> rusqlite::Result<Article<'s>> {
    Ok(Article {
        store,
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author_id: row.get("author_id")?,
        magazine_id: row.get("magazine_id")?,
    })
}

impl PartialEq for Article<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.to_record() == other.to_record()
    }
}

impl Display for Article<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Article #{} '{}' by author #{}",
            self.id, self.title, self.author_id
        )
    }
}
