//! Item repository contract and gateway-backed implementation.
//!
//! # Responsibility
//! - Provide list/create/toggle/rename/remove over the `items` table.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - `create` and `rename` are silent no-ops for blank text.
//! - `set_done` writes the negation of the caller's current flag.
//! - `remove` of a missing id is a silent no-op.
//! - `list_all` always reads through to storage, ordered by `id ASC`.

use crate::gateway::{GatewayError, GatewayRow, StorageGateway};
use crate::model::item::{normalize_item_text, Item, ItemId, ItemValidationError};
use log::{debug, info};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT id, done, value FROM items ORDER BY id ASC;";
const ITEM_INSERT_SQL: &str = "INSERT INTO items (done, value) VALUES (0, ?1);";
const ITEM_SET_DONE_SQL: &str = "UPDATE items SET done = ?1 WHERE id = ?2;";
const ITEM_RENAME_SQL: &str = "UPDATE items SET value = ?1 WHERE id = ?2;";
const ITEM_DELETE_SQL: &str = "DELETE FROM items WHERE id = ?1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Gateway(GatewayError),
    Validation(ItemValidationError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<GatewayError> for RepoError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for item use-cases.
pub trait ItemRepository {
    /// Creates the backing table when absent.
    fn ensure_schema(&mut self) -> RepoResult<()>;
    /// Returns every item in storage order.
    fn list_all(&self) -> RepoResult<Vec<Item>>;
    /// Inserts a new item with `done = false`. Blank text is ignored.
    fn create(&mut self, text: &str) -> RepoResult<()>;
    /// Flips `done` given the flag the caller currently sees.
    fn set_done(&mut self, id: ItemId, current_done: bool) -> RepoResult<()>;
    /// Replaces the item value. Blank text is ignored.
    fn rename(&mut self, id: ItemId, text: &str) -> RepoResult<()>;
    /// Deletes the item. Missing ids are ignored.
    fn remove(&mut self, id: ItemId) -> RepoResult<()>;
}

/// Item repository over an injected storage gateway.
pub struct GatewayItemRepository<G: StorageGateway> {
    gateway: G,
}

impl<G: StorageGateway> GatewayItemRepository<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }
}

impl<G: StorageGateway> ItemRepository for GatewayItemRepository<G> {
    fn ensure_schema(&mut self) -> RepoResult<()> {
        self.gateway.ensure_schema()?;
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<Item>> {
        self.gateway
            .run_query(ITEM_SELECT_SQL, &[])?
            .iter()
            .map(parse_item_row)
            .collect()
    }

    fn create(&mut self, text: &str) -> RepoResult<()> {
        let Some(value) = normalize_item_text(text) else {
            debug!("event=item_create module=repo status=skipped reason=blank_text");
            return Ok(());
        };

        self.gateway
            .run_command(ITEM_INSERT_SQL, &[Value::Text(value.to_string())])?;
        info!(
            "event=item_create module=repo status=ok value_len={}",
            value.chars().count()
        );
        Ok(())
    }

    fn set_done(&mut self, id: ItemId, current_done: bool) -> RepoResult<()> {
        let target = !current_done;
        let affected = self.gateway.run_command(
            ITEM_SET_DONE_SQL,
            &[Value::Integer(bool_to_int(target)), Value::Integer(id.get())],
        )?;
        info!(
            "event=item_toggle module=repo status=ok item_id={id} done={} affected={affected}",
            bool_to_int(target)
        );
        Ok(())
    }

    fn rename(&mut self, id: ItemId, text: &str) -> RepoResult<()> {
        let Some(value) = normalize_item_text(text) else {
            debug!("event=item_rename module=repo status=skipped item_id={id} reason=blank_text");
            return Ok(());
        };

        let affected = self.gateway.run_command(
            ITEM_RENAME_SQL,
            &[Value::Text(value.to_string()), Value::Integer(id.get())],
        )?;
        info!(
            "event=item_rename module=repo status=ok item_id={id} value_len={} affected={affected}",
            value.chars().count()
        );
        Ok(())
    }

    fn remove(&mut self, id: ItemId) -> RepoResult<()> {
        let affected = self
            .gateway
            .run_command(ITEM_DELETE_SQL, &[Value::Integer(id.get())])?;
        info!("event=item_remove module=repo status=ok item_id={id} affected={affected}");
        Ok(())
    }
}

fn parse_item_row(row: &GatewayRow) -> RepoResult<Item> {
    let id = match row.get("id") {
        Some(Value::Integer(value)) => ItemId(*value),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid id value `{other:?}` in items.id"
            )));
        }
    };

    let done = match row.get("done") {
        Some(Value::Integer(0)) => false,
        Some(Value::Integer(1)) => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other:?}` in items.done for id {id}"
            )));
        }
    };

    let value = match row.get("value") {
        Some(Value::Text(text)) => text.clone(),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid value `{other:?}` in items.value for id {id}"
            )));
        }
    };

    let item = Item { id, done, value };
    item.validate()?;
    Ok(item)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_item_row, GatewayItemRepository, ItemRepository, RepoError};
    use crate::gateway::{GatewayResult, GatewayRow, StorageGateway};
    use crate::model::item::ItemId;
    use rusqlite::types::Value;

    /// Records every command and answers queries with canned rows.
    #[derive(Default)]
    struct RecordingGateway {
        commands: Vec<(String, Vec<Value>)>,
        rows: Vec<GatewayRow>,
    }

    impl StorageGateway for RecordingGateway {
        fn ensure_schema(&mut self) -> GatewayResult<()> {
            Ok(())
        }

        fn run_query(&self, _sql: &str, _params: &[Value]) -> GatewayResult<Vec<GatewayRow>> {
            Ok(self.rows.clone())
        }

        fn run_command(&mut self, sql: &str, params: &[Value]) -> GatewayResult<usize> {
            self.commands.push((sql.to_string(), params.to_vec()));
            Ok(1)
        }
    }

    fn row(id: Value, done: Value, value: Value) -> GatewayRow {
        GatewayRow::new(vec![
            ("id".to_string(), id),
            ("done".to_string(), done),
            ("value".to_string(), value),
        ])
    }

    #[test]
    fn blank_text_never_reaches_gateway() {
        let mut repo = GatewayItemRepository::new(RecordingGateway::default());
        repo.create("").unwrap();
        repo.create(" \t ").unwrap();
        repo.rename(ItemId(1), "\n").unwrap();
        assert!(repo.gateway().commands.is_empty());
    }

    #[test]
    fn create_binds_trimmed_text() {
        let mut repo = GatewayItemRepository::new(RecordingGateway::default());
        repo.create("  Buy milk  ").unwrap();

        let commands = &repo.gateway().commands;
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].1, vec![Value::Text("Buy milk".to_string())]);
    }

    #[test]
    fn set_done_writes_negated_flag() {
        let mut repo = GatewayItemRepository::new(RecordingGateway::default());
        repo.set_done(ItemId(3), false).unwrap();
        repo.set_done(ItemId(3), true).unwrap();

        let commands = &repo.gateway().commands;
        assert_eq!(commands[0].1, vec![Value::Integer(1), Value::Integer(3)]);
        assert_eq!(commands[1].1, vec![Value::Integer(0), Value::Integer(3)]);
    }

    #[test]
    fn list_all_rejects_out_of_range_done_flag() {
        let gateway = RecordingGateway {
            rows: vec![row(
                Value::Integer(1),
                Value::Integer(2),
                Value::Text("x".to_string()),
            )],
            ..RecordingGateway::default()
        };
        let repo = GatewayItemRepository::new(gateway);
        let err = repo.list_all().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("items.done")));
    }

    #[test]
    fn parse_rejects_blank_and_null_values() {
        let blank = row(
            Value::Integer(1),
            Value::Integer(0),
            Value::Text("  ".to_string()),
        );
        assert!(matches!(
            parse_item_row(&blank),
            Err(RepoError::Validation(_))
        ));

        let null = row(Value::Integer(1), Value::Integer(0), Value::Null);
        assert!(matches!(
            parse_item_row(&null),
            Err(RepoError::InvalidData(_))
        ));
    }
}
