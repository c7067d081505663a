use magpress_core::db::migrations::latest_version;
use magpress_core::db::{open_db, open_db_in_memory, DbError, DbResult};
use magpress_core::{create_tables, recreate_schema, Author, Store};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "authors");
    assert_table_exists(&conn, "magazines");
    assert_table_exists(&conn, "articles");
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO articles (title, content, author_id, magazine_id)
             VALUES ('Orphan title', 'body', 41, 42);",
            [],
        )
        .unwrap_err();
    assert!(DbError::from(err).is_constraint_violation());
}

#[test]
fn schema_checks_title_length_and_category() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO authors (name) VALUES ('Jane Doe');", [])
        .unwrap();
    conn.execute(
        "INSERT INTO magazines (name, category) VALUES ('Tech Weekly', 'Technology');",
        [],
    )
    .unwrap();

    let short_title = conn
        .execute(
            "INSERT INTO articles (title, content, author_id, magazine_id)
             VALUES ('Four', 'body', 1, 1);",
            [],
        )
        .unwrap_err();
    assert!(DbError::from(short_title).is_constraint_violation());

    let empty_category = conn
        .execute(
            "INSERT INTO magazines (name, category) VALUES ('Other', '');",
            [],
        )
        .unwrap_err();
    assert!(DbError::from(empty_category).is_constraint_violation());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("magpress.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "articles");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match Store::open(&path).unwrap_err() {
        err @ DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
            assert!(!err.is_constraint_violation());
            assert_eq!(
                err.to_string(),
                format!(
                    "catalog schema v999 was written by a newer build (this build reads up to v{})",
                    latest_version()
                )
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn recreate_schema_drops_existing_rows() {
    let store = Store::open_in_memory().unwrap();
    Author::create_or_reuse(&store, "Jane Doe").unwrap();
    assert_eq!(count(&store, "SELECT COUNT(*) FROM authors;"), 1);

    recreate_schema(&store).unwrap();

    assert_eq!(count(&store, "SELECT COUNT(*) FROM authors;"), 0);
    let version = store
        .with_connection(|conn| -> DbResult<u32> { Ok(schema_version(conn)) })
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn recreate_schema_restarts_autoincrement_ids() {
    let store = Store::open_in_memory().unwrap();
    Author::create_or_reuse(&store, "First").unwrap();
    Author::create_or_reuse(&store, "Second").unwrap();

    recreate_schema(&store).unwrap();

    let author = Author::create_or_reuse(&store, "Third").unwrap();
    assert_eq!(author.id(), 1);
}

#[test]
fn create_tables_reports_success_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("setup.db")).unwrap();
    Author::create_or_reuse(&store, "Jane Doe").unwrap();

    assert!(create_tables(&store));
    assert_eq!(count(&store, "SELECT COUNT(*) FROM authors;"), 0);
}

#[test]
fn create_tables_swallows_failures() {
    let conn = Connection::open_in_memory().unwrap();
    // `DROP TABLE` refuses to drop a view of the same name.
    conn.execute_batch("CREATE VIEW articles AS SELECT 1 AS id;")
        .unwrap();
    let store = Store::from_connection(conn);

    assert!(!create_tables(&store));
}

#[test]
fn file_store_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("path.db");
    let store = Store::open(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));

    let memory = Store::open_in_memory().unwrap();
    assert!(memory.path().is_none());
}

fn count(store: &Store, sql: &str) -> i64 {
    store
        .with_connection(|conn| -> DbResult<i64> {
            Ok(conn.query_row(sql, [], |row| row.get(0))?)
        })
        .unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
