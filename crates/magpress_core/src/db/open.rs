//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure pragmas the catalog relies on (cascading foreign keys).
//! - Trigger schema migrations before a store is first used.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `open_db*` connections have migrations fully applied; `connect` assumes
//!   the owning [`super::Store`] already did that.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_bootstrapped("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_bootstrapped("memory", Connection::open_in_memory)
}

/// Opens a per-operation connection to an already migrated database file.
pub fn connect(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let conn = Connection::open(path).map_err(|err| {
        error!(
            "event=db_connect module=db status=error path={} error={}",
            path.display(),
            err
        );
        err
    })?;
    configure_connection(&conn)?;
    debug!(
        "event=db_connect module=db status=ok path={}",
        path.display()
    );
    Ok(conn)
}

fn open_bootstrapped(
    mode: &'static str,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match opener() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    let bootstrapped = configure_connection(&conn).and_then(|()| apply_migrations(&conn));
    match bootstrapped {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
