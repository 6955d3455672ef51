//! Hot-swappable route table.

use parking_lot::RwLock;
use roost_auth::{RouteConfigError, RouteRule, RouteTable};
use roost_types::TryNew;
use std::sync::Arc;

/// A route table that can be replaced while requests are in flight.
///
/// Readers take a snapshot with [`load`](Self::load) and keep it for the
/// whole decision, so one request never sees two tables. Replacement
/// rules are validated before the swap; a rejected reload leaves the
/// current table in place.
///
/// # Example
///
/// ```
/// use roost_runtime::routes::SharedRouteTable;
/// use roost_auth::RouteRule;
///
/// let shared = SharedRouteTable::from_rules(vec![RouteRule::public("/houses")]).unwrap();
/// let before = shared.load();
///
/// assert!(shared.reload(vec![RouteRule::public("/bad//path")]).is_err());
/// assert_eq!(shared.load().len(), 1);
///
/// shared.reload(vec![RouteRule::public("/houses"), RouteRule::public("/about")]).unwrap();
/// assert_eq!(shared.load().len(), 2);
/// assert_eq!(before.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SharedRouteTable {
    current: Arc<RwLock<Arc<RouteTable>>>,
}

impl SharedRouteTable {
    /// Wraps an already validated table.
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Validates `rules` and wraps the result.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError`] if the rules do not form a valid table.
    pub fn from_rules(rules: Vec<RouteRule>) -> Result<Self, RouteConfigError> {
        Ok(Self::new(RouteTable::try_new(rules)?))
    }

    /// A snapshot of the current table.
    #[must_use]
    pub fn load(&self) -> Arc<RouteTable> {
        Arc::clone(&*self.current.read())
    }

    /// Validates `rules` and swaps them in.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError`] and keeps the current table if the
    /// rules are invalid.
    pub fn reload(&self, rules: Vec<RouteRule>) -> Result<(), RouteConfigError> {
        match RouteTable::try_new(rules) {
            Ok(table) => {
                let count = table.len();
                *self.current.write() = Arc::new(table);
                tracing::info!(rules = count, "route table reloaded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    pattern = e.pattern(),
                    error = %e,
                    "route table reload rejected, keeping current table"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_auth::Permission;

    #[test]
    fn snapshot_survives_reload() {
        let shared = SharedRouteTable::from_rules(vec![
            RouteRule::protected("/reports").requires(Permission::ViewAnalytics),
        ])
        .unwrap();
        let snapshot = shared.load();

        shared
            .reload(vec![RouteRule::public("/reports")])
            .unwrap();

        assert!(!snapshot.match_path("/reports").unwrap().is_public());
        assert!(shared.load().match_path("/reports").unwrap().is_public());
    }

    #[test]
    fn rejected_reload_keeps_table() {
        let shared = SharedRouteTable::from_rules(vec![RouteRule::public("/houses")]).unwrap();
        let err = shared
            .reload(vec![RouteRule::public("/a"), RouteRule::public("/a")])
            .unwrap_err();
        assert_eq!(err.pattern(), "/a");
        assert!(shared.load().match_path("/houses").is_some());
    }

    #[test]
    fn clones_share_the_table() {
        let shared = SharedRouteTable::new(RouteTable::default());
        let other = shared.clone();
        other.reload(vec![RouteRule::public("/")]).unwrap();
        assert_eq!(shared.load().len(), 1);
    }
}
