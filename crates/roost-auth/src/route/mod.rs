//! Route table and matcher.
//!
//! ```text
//! RouteRule (authored)  ──TryNew──►  RouteTable (validated, ordered)
//!                                         │
//!                             match_path("/admin/H1")
//!                                         │
//!                                         ▼
//!                      RouteMatch { rule, params: {houseId: "H1"} }
//! ```

mod pattern;
mod rule;
mod table;

pub use pattern::RoutePattern;
pub use rule::RouteRule;
pub use table::{RouteMatch, RouteTable};

use crate::RouteConfigError;
use roost_types::TryNew;
use serde::Serialize;
use std::collections::BTreeMap;

/// Named path-segment bindings, e.g. `{houseId: "H1"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    /// The value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bindings ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }
}

/// Compiles `pattern` and extracts its bindings from `path`.
///
/// Empty when the pattern does not match. For repeated use, compile once
/// with [`RoutePattern`] instead.
///
/// # Errors
///
/// Returns [`RouteConfigError`] if `pattern` does not compile.
///
/// # Example
///
/// ```
/// let params = roost_auth::extract_params("/houses/:houseId", "/houses/H7").unwrap();
/// assert_eq!(params.get("houseId"), Some("H7"));
/// ```
pub fn extract_params(pattern: &str, path: &str) -> Result<RouteParams, RouteConfigError> {
    Ok(RoutePattern::try_new(pattern.to_string())?.extract_params(path))
}
