//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the presentation gestures (submit, toggle, delete, edit) to Dart.
//! - Own the single process-wide controller and its store selection.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every action response carries a full snapshot reloaded from storage.
//! - Gestures are serialized through one mutex; no two mutations overlap.

use log::warn;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use taskmaster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_controller,
    ping as ping_inner, AppController, Item, ItemId, RepoResult, RowMode, StorageBackend,
    StoreLocation,
};

const DB_FILE_NAME: &str = "taskmaster.sqlite3";
const DB_PATH_ENV: &str = "TASKMASTER_DB_PATH";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CONTROLLER: Lazy<Mutex<Option<AppController>>> = Lazy::new(|| Mutex::new(None));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by the controller.
///
/// Must be called before the first `todo_*` call to take effect. Returns an
/// empty string on success, or a message when the path is blank or a path is
/// already in use.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: i64,
    pub done: bool,
    pub value: String,
    /// Whether the row renders as an edit field.
    pub editing: bool,
}

/// Full view state after a gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoSnapshot {
    pub items: Vec<TodoRow>,
    pub draft: String,
    pub editing_id: Option<i64>,
    pub editing_text: Option<String>,
}

/// Envelope for every todo call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoResponse {
    pub ok: bool,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
    pub snapshot: TodoSnapshot,
}

/// Returns the current state, opening the store on first use.
pub fn todo_snapshot() -> TodoResponse {
    with_controller("todo_snapshot", |_| Ok(()))
}

/// Submits the input box text as a new item. Blank text changes nothing.
pub fn todo_submit_draft(text: String) -> TodoResponse {
    with_controller("todo_submit_draft", |controller| {
        controller.on_submit_draft_text(text)
    })
}

/// Toggles `done` for one item.
pub fn todo_toggle(id: i64) -> TodoResponse {
    with_controller("todo_toggle", |controller| controller.on_toggle(ItemId(id)))
}

/// Deletes one item (long-press gesture).
pub fn todo_delete(id: i64) -> TodoResponse {
    with_controller("todo_delete", |controller| controller.on_delete(ItemId(id)))
}

/// Enters edit mode for one item.
pub fn todo_start_edit(id: i64) -> TodoResponse {
    with_controller("todo_start_edit", |controller| {
        controller.on_start_edit(ItemId(id));
        Ok(())
    })
}

/// Commits edit text for one item (focus lost). Blank text keeps edit mode.
pub fn todo_commit_edit(id: i64, text: String) -> TodoResponse {
    with_controller("todo_commit_edit", |controller| {
        controller.set_edit_text(text.as_str());
        controller.on_commit_edit(ItemId(id), text.as_str())
    })
}

fn with_controller(
    op: &'static str,
    f: impl FnOnce(&mut AppController) -> RepoResult<()>,
) -> TodoResponse {
    let mut guard = lock_controller();
    if guard.is_none() {
        let location = StoreLocation::File(resolve_db_path());
        match open_controller(StorageBackend::detect(), &location) {
            Ok(controller) => *guard = Some(controller),
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error op={op} error_code=store_open_failed");
                return TodoResponse {
                    ok: false,
                    message: format!("{op} failed: {err}"),
                    snapshot: TodoSnapshot::default(),
                };
            }
        }
    }

    let Some(controller) = guard.as_mut() else {
        return TodoResponse {
            ok: false,
            message: format!("{op} failed: controller unavailable"),
            snapshot: TodoSnapshot::default(),
        };
    };

    let outcome = f(controller);
    let snapshot = snapshot_of(controller);
    match outcome {
        Ok(()) => TodoResponse {
            ok: true,
            message: String::new(),
            snapshot,
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} error_code=store_failed");
            TodoResponse {
                ok: false,
                message: format!("{op} failed: {err}"),
                snapshot,
            }
        }
    }
}

fn lock_controller() -> MutexGuard<'static, Option<AppController>> {
    CONTROLLER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn snapshot_of(controller: &AppController) -> TodoSnapshot {
    TodoSnapshot {
        items: controller
            .items()
            .iter()
            .map(|item| to_row(controller, item))
            .collect(),
        draft: controller.draft().to_string(),
        editing_id: controller.editing().map(|session| session.item_id.get()),
        editing_text: controller.editing().map(|session| session.text.clone()),
    }
}

fn to_row(controller: &AppController, item: &Item) -> TodoRow {
    TodoRow {
        id: item.id.get(),
        done: item.done,
        value: item.value.clone(),
        editing: controller.row_mode(item.id) == RowMode::Editing,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}
