use stockroom_core::db::migrations::latest_version;
use stockroom_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "products");
    assert_index_exists(&conn, "idx_products_product_name");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockroom.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "products");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pending_migrations_apply_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upgrade.db");

    // Hand-build a version-1 database, as an older binary would have left it.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL,
            photo_uri TEXT NOT NULL DEFAULT 'no image',
            supplier_name TEXT,
            supplier_email TEXT
        );
        PRAGMA user_version = 1;",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO products (product_name, price) VALUES (?1, ?2);",
        rusqlite::params!["Kept Product", 2.5],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_index_exists(&conn, "idx_products_product_name");

    // Data written by the older schema survives the upgrade.
    let name: String = conn
        .query_row("SELECT product_name FROM products;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Kept Product");
}

#[test]
fn schema_defaults_apply_for_absent_columns() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO products (product_name, price) VALUES (?1, ?2);",
        rusqlite::params!["Widget", 9.99],
    )
    .unwrap();

    let (quantity, photo_uri): (i64, String) = conn
        .query_row(
            "SELECT quantity, photo_uri FROM products;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(quantity, 0);
    assert_eq!(photo_uri, "no image");
}

#[test]
fn keys_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO products (product_name, price) VALUES ('a', 1.0);",
        [],
    )
    .unwrap();
    let first = conn.last_insert_rowid();

    conn.execute("DELETE FROM products;", []).unwrap();
    conn.execute(
        "INSERT INTO products (product_name, price) VALUES ('b', 1.0);",
        [],
    )
    .unwrap();
    let second = conn.last_insert_rowid();

    assert!(second > first);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table: &str) {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1, "missing table `{table}`");
}

fn assert_index_exists(conn: &Connection, index: &str) {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1;",
            [index],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1, "missing index `{index}`");
}
