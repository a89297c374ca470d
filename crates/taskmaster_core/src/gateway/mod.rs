//! Storage gateway capability and backend selection.
//!
//! # Responsibility
//! - Define the narrow SQL access contract used by repositories.
//! - Select the concrete backend once at startup.
//!
//! # Invariants
//! - Mutating commands are atomic: readers never observe partial writes.
//! - The no-op backend never returns an error.

use crate::db::DbError;
use log::info;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod noop;
mod sqlite;

pub use noop::NoopGateway;
pub use sqlite::SqliteGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Boxed gateway as returned by [`open_gateway`].
pub type DynGateway = Box<dyn StorageGateway + Send>;

#[derive(Debug)]
pub enum GatewayError {
    Db(DbError),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One result row, keyed by column name in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayRow {
    columns: Vec<(String, Value)>,
}

impl GatewayRow {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Returns the value of `column`, or `None` when the row has no such column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Parametrized SQL access over one local store.
pub trait StorageGateway {
    /// Creates the items table when absent. Safe to call on every startup.
    fn ensure_schema(&mut self) -> GatewayResult<()>;
    /// Runs a read statement and returns all rows.
    fn run_query(&self, sql: &str, params: &[Value]) -> GatewayResult<Vec<GatewayRow>>;
    /// Runs one mutating statement atomically and returns affected row count.
    fn run_command(&mut self, sql: &str, params: &[Value]) -> GatewayResult<usize>;
}

impl<G: StorageGateway + ?Sized> StorageGateway for Box<G> {
    fn ensure_schema(&mut self) -> GatewayResult<()> {
        (**self).ensure_schema()
    }

    fn run_query(&self, sql: &str, params: &[Value]) -> GatewayResult<Vec<GatewayRow>> {
        (**self).run_query(sql, params)
    }

    fn run_command(&mut self, sql: &str, params: &[Value]) -> GatewayResult<usize> {
        (**self).run_command(sql, params)
    }
}

/// Storage backend kind, chosen once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Embedded SQLite store.
    Sqlite,
    /// Accepts everything and stores nothing.
    Noop,
}

impl StorageBackend {
    /// Picks the backend available on the compilation target.
    ///
    /// - wasm targets -> `Noop`
    /// - everything else -> `Sqlite`
    pub fn detect() -> Self {
        if cfg!(target_family = "wasm") {
            Self::Noop
        } else {
            Self::Sqlite
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Noop => "noop",
        }
    }
}

/// Where the SQLite backend keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Opens the gateway for `backend`.
///
/// `location` is ignored for [`StorageBackend::Noop`].
///
/// # Errors
/// - Returns `GatewayError::Db` when the SQLite file cannot be opened or its
///   schema cannot be applied.
pub fn open_gateway(backend: StorageBackend, location: &StoreLocation) -> GatewayResult<DynGateway> {
    info!(
        "event=gateway_open module=gateway status=start backend={}",
        backend.as_str()
    );
    let gateway: DynGateway = match (backend, location) {
        (StorageBackend::Noop, _) => Box::new(NoopGateway::new()),
        (StorageBackend::Sqlite, StoreLocation::File(path)) => Box::new(SqliteGateway::open(path)?),
        (StorageBackend::Sqlite, StoreLocation::Memory) => Box::new(SqliteGateway::open_in_memory()?),
    };
    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::{open_gateway, GatewayRow, StorageBackend, StoreLocation};
    use rusqlite::types::Value;

    #[test]
    fn row_lookup_is_by_column_name() {
        let row = GatewayRow::new(vec![
            ("id".to_string(), Value::Integer(7)),
            ("value".to_string(), Value::Text("x".to_string())),
        ]);
        assert_eq!(row.get("id"), Some(&Value::Integer(7)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn detect_picks_sqlite_on_native_targets() {
        assert_eq!(StorageBackend::detect(), StorageBackend::Sqlite);
    }

    #[test]
    fn noop_backend_ignores_location() {
        let mut gateway = open_gateway(
            StorageBackend::Noop,
            &StoreLocation::File("/nonexistent/dir/items.db".into()),
        )
        .unwrap();
        gateway.ensure_schema().unwrap();
        assert!(gateway.run_query("SELECT 1", &[]).unwrap().is_empty());
    }
}
