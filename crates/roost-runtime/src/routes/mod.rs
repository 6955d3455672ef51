//! Route table sources.
//!
//! ```text
//! GateConfig.routes ── Some ──► RouteTable::try_new(rules)
//!        │
//!        └──────────── None ──► RouteTable::try_new(house_routes())
//!                                        │
//!                                        ▼
//!                                SharedRouteTable (snapshot per request)
//! ```

mod defaults;
mod shared;

pub use defaults::house_routes;
pub use shared::SharedRouteTable;

use crate::config::GateConfig;
use roost_auth::{RouteConfigError, RouteRule, RouteTable};
use roost_types::TryNew;

/// The rules `config` selects: its own list, or the built-in table.
#[must_use]
pub fn configured_rules(config: &GateConfig) -> Vec<RouteRule> {
    config.routes.clone().unwrap_or_else(house_routes)
}

/// Builds and validates the table `config` selects.
///
/// # Errors
///
/// Returns [`RouteConfigError`] for the first invalid rule.
pub fn load_table(config: &GateConfig) -> Result<RouteTable, RouteConfigError> {
    let rules = configured_rules(config);
    let source = if config.routes.is_some() { "config" } else { "built-in" };
    let table = RouteTable::try_new(rules)?;
    tracing::debug!(source, rules = table.len(), "route table loaded");
    Ok(table)
}
