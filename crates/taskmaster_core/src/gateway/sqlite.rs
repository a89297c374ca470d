//! SQLite-backed storage gateway.

use super::{GatewayResult, GatewayRow, StorageGateway};
use crate::db::migrations::apply_migrations;
use crate::db::{open_db, open_db_in_memory};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

/// Gateway over one owned SQLite connection.
pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> GatewayResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> GatewayResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already-open connection. The schema is applied on
    /// [`StorageGateway::ensure_schema`].
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Read access for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StorageGateway for SqliteGateway {
    fn ensure_schema(&mut self) -> GatewayResult<()> {
        apply_migrations(&mut self.conn)?;
        debug!("event=schema_ensure module=gateway status=ok backend=sqlite");
        Ok(())
    }

    fn run_query(&self, sql: &str, params: &[Value]) -> GatewayResult<Vec<GatewayRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = stmt.query(params_from_iter(params))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                columns.push((name.clone(), row.get::<_, Value>(index)?));
            }
            out.push(GatewayRow::new(columns));
        }

        Ok(out)
    }

    fn run_command(&mut self, sql: &str, params: &[Value]) -> GatewayResult<usize> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute(sql, params_from_iter(params))?;
        tx.commit()?;
        Ok(affected)
    }
}
