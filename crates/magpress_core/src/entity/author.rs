//! Author entity.
//!
//! # Responsibility
//! - Create-or-reuse authors by trimmed name, load them by id.
//! - Rename authors in place.
//! - List the articles and magazines an author contributed to.
//!
//! # Invariants
//! - Author names are unique; creating an existing name reuses its row.
//! - A stub author (`name == None`) only knows its id until refreshed.

use crate::db::Store;
use crate::entity::magazine::Magazine;
use crate::entity::{EntityError, EntityResult};
use crate::model::records::{ArticleRow, AuthorRecord};
use crate::model::validation::{normalize_author_name, validate_id, ValidationError};
use crate::model::AuthorId;
use log::{error, info};
use rusqlite::{params, OptionalExtension};
use std::fmt::{Display, Formatter};

const ENTITY: &str = "author";

/// Writer of articles, bound to the store it was loaded from.
#[derive(Debug)]
pub struct Author<'s> {
    store: &'s Store,
    id: AuthorId,
    name: Option<String>,
}

impl<'s> Author<'s> {
    /// Loads by `id` when given, otherwise creates or reuses by `name`.
    ///
    /// An empty `name` counts as not supplied.
    ///
    /// # Errors
    /// - `Validation(MissingIdentity)` when neither input is usable.
    /// - Errors from [`Self::get`] or [`Self::create_or_reuse`] otherwise.
    pub fn construct(
        store: &'s Store,
        id: Option<AuthorId>,
        name: Option<&str>,
    ) -> EntityResult<Self> {
        if let Some(id) = id {
            return Self::get(store, id);
        }
        match name {
            Some(name) if !name.is_empty() => Self::create_or_reuse(store, name),
            _ => Err(ValidationError::MissingIdentity(ENTITY).into()),
        }
    }

    /// Loads a fully hydrated author by id.
    ///
    /// # Errors
    /// - `Validation` when `id` is not positive.
    /// - `NotFound` when no row has this id.
    pub fn get(store: &'s Store, id: AuthorId) -> EntityResult<Self> {
        let id = validate_id("author id", id)?;
        let name = store.with_connection(|conn| -> EntityResult<Option<String>> {
            Ok(conn
                .query_row("SELECT name FROM authors WHERE id = ?1;", [id], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;

        match name {
            Some(name) => Ok(Self::hydrated(store, id, name)),
            None => Err(EntityError::not_found(ENTITY, id)),
        }
    }

    /// Returns the author named `name` (after trimming), inserting it first
    /// when no such row exists.
    pub fn create_or_reuse(store: &'s Store, name: &str) -> EntityResult<Self> {
        let name = normalize_author_name(name)?;
        let (id, reused) = store.with_connection(|conn| -> EntityResult<(AuthorId, bool)> {
            let existing: Option<AuthorId> = conn
                .query_row(
                    "SELECT id FROM authors WHERE name = ?1;",
                    [name.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(id) = existing {
                return Ok((id, true));
            }

            conn.execute("INSERT INTO authors (name) VALUES (?1);", [name.as_str()])?;
            Ok((conn.last_insert_rowid(), false))
        })?;

        info!("event=author_create module=entity status=ok id={id} reused={reused}");
        Ok(Self::hydrated(store, id, name))
    }

    /// Builds a stub that knows only its id. Nothing is read from storage.
    pub fn stub(store: &'s Store, id: AuthorId) -> EntityResult<Self> {
        let id = validate_id("author id", id)?;
        Ok(Self {
            store,
            id,
            name: None,
        })
    }

    pub(crate) fn hydrated(store: &'s Store, id: AuthorId, name: String) -> Self {
        Self {
            store,
            id,
            name: Some(name),
        }
    }

    pub fn id(&self) -> AuthorId {
        self.id
    }

    /// Repoints this entity at another row without reading it.
    ///
    /// The cached name no longer describes the row, so the entity becomes a stub.
    pub fn set_id(&mut self, id: AuthorId) -> EntityResult<()> {
        self.id = validate_id("author id", id)?;
        self.name = None;
        Ok(())
    }

    /// Cached name; `None` for stubs.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.name.is_some()
    }

    /// Re-reads the row for the current id.
    pub fn refresh(&mut self) -> EntityResult<()> {
        let fresh = Self::get(self.store, self.id)?;
        self.name = fresh.name;
        Ok(())
    }

    /// Returns the name, reading it from storage first when this is a stub.
    pub fn load_name(&mut self) -> EntityResult<&str> {
        if self.name.is_none() {
            self.refresh()?;
        }
        Ok(self.name.as_deref().unwrap_or_default())
    }

    /// Renames the author.
    ///
    /// # Errors
    /// - `Validation` when the trimmed name is empty.
    /// - `NotFound` when the row no longer exists.
    /// - `Storage` when another author already has this name.
    pub fn set_name(&mut self, new_name: &str) -> EntityResult<()> {
        let new_name = normalize_author_name(new_name)?;
        let id = self.id;
        let changed = self.store.with_connection(|conn| {
            conn.execute(
                "UPDATE authors SET name = ?1 WHERE id = ?2;",
                params![new_name.as_str(), id],
            )
            .map_err(EntityError::from)
        })?;
        if changed == 0 {
            return Err(EntityError::not_found(ENTITY, id));
        }

        self.name = Some(new_name);
        Ok(())
    }

    /// Raw rows of every article written by this author, in insertion order.
    pub fn articles(&self) -> EntityResult<Vec<ArticleRow>> {
        let id = self.id;
        let result = self.store.with_connection(|conn| -> EntityResult<Vec<ArticleRow>> {
            let mut stmt = conn.prepare(
                "SELECT title, content, author_id, magazine_id
                 FROM articles
                 WHERE author_id = ?1
                 ORDER BY id ASC;",
            )?;
            let rows = stmt.query_map([id], |row| {
                Ok(ArticleRow {
                    title: row.get(0)?,
                    content: row.get(1)?,
                    author_id: row.get(2)?,
                    magazine_id: row.get(3)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        });

        if let Err(err) = &result {
            error!("event=author_articles module=entity status=error author_id={id} error={err}");
        }
        result
    }

    /// Distinct magazines this author has at least one article in, by magazine id.
    pub fn magazines(&self) -> EntityResult<Vec<Magazine<'s>>> {
        let id = self.id;
        let store = self.store;
        let result = store.with_connection(|conn| -> EntityResult<Vec<Magazine<'s>>> {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT magazines.id, magazines.name, magazines.category
                 FROM magazines
                 INNER JOIN articles ON articles.magazine_id = magazines.id
                 WHERE articles.author_id = ?1
                 ORDER BY magazines.id ASC;",
            )?;
            let rows = stmt.query_map([id], |row| {
                Ok(Magazine::hydrated(store, row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        });

        if let Err(err) = &result {
            error!("event=author_magazines module=entity status=error author_id={id} error={err}");
        }
        result
    }

    /// Serializable snapshot. Loads the name first for stubs.
    pub fn to_record(&mut self) -> EntityResult<AuthorRecord> {
        let name = self.load_name()?.to_string();
        Ok(AuthorRecord { id: self.id, name })
    }
}

impl PartialEq for Author<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Display for Author<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Author #{} ({name})", self.id),
            None => write!(f, "Author #{} (not loaded)", self.id),
        }
    }
}
