//! Storage gateway for targets without an embedded store.
//!
//! Every write is accepted and discarded; every read is empty.

use super::{GatewayResult, GatewayRow, StorageGateway};
use log::warn;
use rusqlite::types::Value;

#[derive(Debug, Default)]
pub struct NoopGateway {
    _private: (),
}

impl NoopGateway {
    pub fn new() -> Self {
        warn!("event=store_fallback module=gateway status=ok backend=noop persistence=disabled");
        Self { _private: () }
    }
}

impl StorageGateway for NoopGateway {
    fn ensure_schema(&mut self) -> GatewayResult<()> {
        Ok(())
    }

    fn run_query(&self, _sql: &str, _params: &[Value]) -> GatewayResult<Vec<GatewayRow>> {
        Ok(Vec::new())
    }

    fn run_command(&mut self, _sql: &str, _params: &[Value]) -> GatewayResult<usize> {
        Ok(0)
    }
}
