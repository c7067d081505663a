//! Destructive schema setup.
//!
//! # Responsibility
//! - Drop and recreate the catalog tables on demand.
//!
//! # Invariants
//! - Tables are dropped referencing-first so foreign keys never block a drop.
//! - `create_tables` never propagates a failure; it logs and reports `false`.

use super::migrations::{apply_migrations, CATALOG_TABLES};
use super::{DbResult, Store};
use log::{error, info};
use std::time::Instant;

/// Drops every catalog table and re-applies migrations from version zero.
///
/// All existing authors, magazines and articles are lost.
pub fn recreate_schema(store: &Store) -> DbResult<()> {
    store.with_connection(|conn| {
        for table in CATALOG_TABLES {
            info!("event=schema_drop module=db status=start table={table}");
            conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
        }
        conn.execute_batch("PRAGMA user_version = 0;")?;
        apply_migrations(conn)
    })
}

/// Setup entry point: recreates the schema and reports success.
///
/// Failures are logged with `event=schema_setup status=error` and swallowed.
pub fn create_tables(store: &Store) -> bool {
    let started_at = Instant::now();
    info!("event=schema_setup module=db status=start");

    match recreate_schema(store) {
        Ok(()) => {
            info!(
                "event=schema_setup module=db status=ok duration_ms={} tables={}",
                started_at.elapsed().as_millis(),
                CATALOG_TABLES.join(",")
            );
            true
        }
        Err(err) => {
            error!(
                "event=schema_setup module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            false
        }
    }
}
