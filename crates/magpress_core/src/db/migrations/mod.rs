//! Catalog schema versions.
//!
//! # Responsibility
//! - Register catalog schema migrations in strictly increasing order.
//! - Bring a database up to the newest catalog schema in one transaction.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - `PRAGMA user_version` always names the last applied catalog version.
//! - A failed upgrade leaves the database at the version it started from.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_catalog.sql"),
}];

/// Tables created by the migrations, in drop order (referencing tables first).
pub const CATALOG_TABLES: [&str; 3] = ["articles", "magazines", "authors"];

/// Newest catalog schema version this build can read and write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Upgrades the catalog schema on `conn` to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` naming the version whose SQL failed.
pub fn apply_migrations(conn: &Connection) -> DbResult<()> {
    apply_pending(conn, MIGRATIONS)
}

fn apply_pending(conn: &Connection, migrations: &[Migration]) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let supported = migrations.last().map_or(0, |migration| migration.version);

    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    // Callers only hold `&Connection`.
    let tx = conn.unchecked_transaction()?;
    for migration in migrations.iter().filter(|m| m.version > found) {
        let version = migration.version;
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.execute_batch(&format!("PRAGMA user_version = {version};")))
            .map_err(|source| DbError::Migration { version, source })?;
        info!("event=schema_migrate module=db status=ok version={version}");
    }
    tx.commit()?;

    Ok(())
}
