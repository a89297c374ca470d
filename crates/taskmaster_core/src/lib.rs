//! Core domain logic for TaskMaster.
//! This crate is the single source of truth for to-do item invariants.

pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use gateway::{
    open_gateway, DynGateway, GatewayError, GatewayResult, GatewayRow, NoopGateway,
    SqliteGateway, StorageBackend, StorageGateway, StoreLocation,
};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LogLevel};
pub use model::item::{is_blank, normalize_item_text, Item, ItemId, ItemValidationError};
pub use repo::item_repo::{GatewayItemRepository, ItemRepository, RepoError, RepoResult};
pub use service::todo_controller::{EditSession, RowMode, TodoController};

/// Controller wired to a runtime-selected gateway.
pub type AppController = TodoController<GatewayItemRepository<DynGateway>>;

/// Opens the selected backend and returns a loaded controller.
///
/// # Errors
/// - Propagates gateway open failures and the initial list read.
pub fn open_controller(
    backend: StorageBackend,
    location: &StoreLocation,
) -> RepoResult<AppController> {
    let gateway = open_gateway(backend, location)?;
    let mut controller = TodoController::new(GatewayItemRepository::new(gateway));
    controller.load()?;
    Ok(controller)
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
