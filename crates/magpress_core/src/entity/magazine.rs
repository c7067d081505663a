//! Magazine entity.
//!
//! # Responsibility
//! - Create-or-reuse magazines by `(name, category)`, load them by id.
//! - Update name and category independently.
//! - List a magazine's articles and its distinct contributors.
//!
//! # Invariants
//! - Reuse matches on the `(name, category)` pair, while the schema declares
//!   `name` alone unique. A second magazine with a known name and a new
//!   category passes the pair lookup and then fails the insert with
//!   `EntityError::Storage`.
//! - Name and category are stored untrimmed.

use crate::db::Store;
use crate::entity::author::Author;
use crate::entity::{EntityError, EntityResult};
use crate::model::records::{MagazineArticleRow, MagazineRecord};
use crate::model::validation::{
    validate_category, validate_id, validate_magazine_name, ValidationError,
};
use crate::model::MagazineId;
use log::{error, info};
use rusqlite::{params, OptionalExtension};
use std::fmt::{Display, Formatter};

const ENTITY: &str = "magazine";

/// Publication that articles belong to.
#[derive(Debug)]
pub struct Magazine<'s> {
    store: &'s Store,
    id: MagazineId,
    name: Option<String>,
    category: Option<String>,
}

impl<'s> Magazine<'s> {
    /// Loads by `id` when given, otherwise creates or reuses by
    /// `(name, category)`. Empty strings count as not supplied.
    pub fn construct(
        store: &'s Store,
        id: Option<MagazineId>,
        name: Option<&str>,
        category: Option<&str>,
    ) -> EntityResult<Self> {
        if let Some(id) = id {
            return Self::get(store, id);
        }
        match (name, category) {
            (Some(name), Some(category)) if !name.is_empty() && !category.is_empty() => {
                Self::create_or_reuse(store, name, category)
            }
            _ => Err(ValidationError::MissingIdentity(ENTITY).into()),
        }
    }

    /// Loads a fully hydrated magazine by id.
    ///
    /// # Errors
    /// - `Validation` when `id` is not positive.
    /// - `NotFound` when no row has this id.
    pub fn get(store: &'s Store, id: MagazineId) -> EntityResult<Self> {
        let id = validate_id("magazine id", id)?;
        let row = store.with_connection(|conn| -> EntityResult<Option<(String, String)>> {
            Ok(conn
                .query_row(
                    "SELECT name, category FROM magazines WHERE id = ?1;",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?)
        })?;

        let (name, category) = row.ok_or_else(|| EntityError::not_found(ENTITY, id))?;
        Ok(Self::hydrated(store, id, name, category))
    }

    /// Returns the magazine matching both `name` and `category`, inserting it
    /// first when no such row exists.
    ///
    /// # Errors
    /// - `Validation` for a name outside 2-16 characters or an empty category.
    /// - `Storage` when `name` already exists under another category.
    pub fn create_or_reuse(store: &'s Store, name: &str, category: &str) -> EntityResult<Self> {
        validate_magazine_name(name)?;
        validate_category(category)?;

        let (id, reused) = store.with_connection(|conn| -> EntityResult<(MagazineId, bool)> {
            let existing: Option<MagazineId> = conn
                .query_row(
                    "SELECT id FROM magazines WHERE name = ?1 AND category = ?2;",
                    [name, category],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(id) = existing {
                return Ok((id, true));
            }

            conn.execute(
                "INSERT INTO magazines (name, category) VALUES (?1, ?2);",
                [name, category],
            )?;
            Ok((conn.last_insert_rowid(), false))
        })?;

        info!("event=magazine_create module=entity status=ok id={id} reused={reused}");
        Ok(Self::hydrated(
            store,
            id,
            name.to_string(),
            category.to_string(),
        ))
    }

    /// Builds a stub that knows only its id.
    pub fn stub(store: &'s Store, id: MagazineId) -> EntityResult<Self> {
        let id = validate_id("magazine id", id)?;
        Ok(Self {
            store,
            id,
            name: None,
            category: None,
        })
    }

    pub(crate) fn hydrated(
        store: &'s Store,
        id: MagazineId,
        name: String,
        category: String,
    ) -> Self {
        Self {
            store,
            id,
            name: Some(name),
            category: Some(category),
        }
    }

    pub fn id(&self) -> MagazineId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.name.is_some() && self.category.is_some()
    }

    /// Re-reads the whole row, replacing both cached fields.
    pub fn refresh(&mut self) -> EntityResult<()> {
        let fresh = Self::get(self.store, self.id)?;
        self.name = fresh.name;
        self.category = fresh.category;
        Ok(())
    }

    /// Returns the name, refreshing the whole row first when it is not cached.
    pub fn load_name(&mut self) -> EntityResult<&str> {
        if self.name.is_none() {
            self.refresh()?;
        }
        Ok(self.name.as_deref().unwrap_or_default())
    }

    /// Returns the category, refreshing the whole row first when it is not cached.
    pub fn load_category(&mut self) -> EntityResult<&str> {
        if self.category.is_none() {
            self.refresh()?;
        }
        Ok(self.category.as_deref().unwrap_or_default())
    }

    /// Renames the magazine.
    ///
    /// # Errors
    /// - `Validation` for a name outside 2-16 characters.
    /// - `NotFound` when the row no longer exists.
    /// - `Storage` when another magazine already uses the name.
    pub fn set_name(&mut self, new_name: &str) -> EntityResult<()> {
        validate_magazine_name(new_name)?;
        self.update_column("name", new_name)?;
        self.name = Some(new_name.to_string());
        Ok(())
    }

    /// Moves the magazine to another category.
    pub fn set_category(&mut self, new_category: &str) -> EntityResult<()> {
        validate_category(new_category)?;
        self.update_column("category", new_category)?;
        self.category = Some(new_category.to_string());
        Ok(())
    }

    fn update_column(&self, column: &'static str, value: &str) -> EntityResult<()> {
        let id = self.id;
        let changed = self.store.with_connection(|conn| {
            conn.execute(
                &format!("UPDATE magazines SET {column} = ?1 WHERE id = ?2;"),
                params![value, id],
            )
            .map_err(EntityError::from)
        })?;
        if changed == 0 {
            return Err(EntityError::not_found(ENTITY, id));
        }
        Ok(())
    }

    /// Raw rows of every article in this magazine, in insertion order.
    pub fn articles(&self) -> EntityResult<Vec<MagazineArticleRow>> {
        let id = self.id;
        let result = self
            .store
            .with_connection(|conn| -> EntityResult<Vec<MagazineArticleRow>> {
                let mut stmt = conn.prepare(
                    "SELECT title, content, author_id
                     FROM articles
                     WHERE magazine_id = ?1
                     ORDER BY id ASC;",
                )?;
                let rows = stmt.query_map([id], |row| {
                    Ok(MagazineArticleRow {
                        title: row.get(0)?,
                        content: row.get(1)?,
                        author_id: row.get(2)?,
                    })
                })?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            });

        if let Err(err) = &result {
            error!("event=magazine_articles module=entity status=error magazine_id={id} error={err}");
        }
        result
    }

    /// Distinct authors with at least one article in this magazine, by author id.
    ///
    /// Authors are hydrated from the stored `(id, name)` as-is. Nothing is
    /// written, even when a stored name is not in trimmed form.
    pub fn contributors(&self) -> EntityResult<Vec<Author<'s>>> {
        let id = self.id;
        let store = self.store;
        let result = store.with_connection(|conn| -> EntityResult<Vec<Author<'s>>> {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT authors.id, authors.name
                 FROM authors
                 INNER JOIN articles ON articles.author_id = authors.id
                 WHERE articles.magazine_id = ?1
                 ORDER BY authors.id ASC;",
            )?;
            let rows = stmt.query_map([id], |row| {
                Ok(Author::hydrated(store, row.get(0)?, row.get(1)?))
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        });

        if let Err(err) = &result {
            error!(
                "event=magazine_contributors module=entity status=error magazine_id={id} error={err}"
            );
        }
        result
    }

    /// Serializable snapshot. Loads the row first for stubs.
    pub fn to_record(&mut self) -> EntityResult<MagazineRecord> {
        if !self.is_fully_loaded() {
            self.refresh()?;
        }
        Ok(MagazineRecord {
            id: self.id,
            name: self.name.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
        })
    }
}

impl PartialEq for Magazine<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.category == other.category
    }
}

impl Display for Magazine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.name, &self.category) {
            (Some(name), Some(category)) => {
                write!(f, "Magazine #{} ({name}, category {category})", self.id)
            }
            _ => write!(f, "Magazine #{} (not loaded)", self.id),
        }
    }
}
