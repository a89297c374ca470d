use rusqlite::Connection;
use taskmaster_core::db::migrations::latest_version;
use taskmaster_core::db::{open_db, open_db_in_memory, DbError};
use taskmaster_core::{GatewayItemRepository, ItemRepository, SqliteGateway};

#[test]
fn open_db_in_memory_creates_items_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "items");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskmaster.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO items (done, value) VALUES (0, 'kept');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn unversioned_database_with_existing_items_table_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "create table if not exists items (id integer primary key not null, done int, value text);
         insert into items (done, value) values (1, 'legacy row');",
    )
    .unwrap();
    drop(conn);

    let repo = GatewayItemRepository::new(SqliteGateway::open(&path).unwrap());
    let items = repo.list_all().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].done);
    assert_eq!(items[0].value, "legacy row");
    assert_eq!(schema_version(repo.gateway().connection()), latest_version());
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
