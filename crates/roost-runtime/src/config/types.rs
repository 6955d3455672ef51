//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::ConfigError;
use roost_auth::{RouteRule, UnknownRolePolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gate configuration.
///
/// This is the unified configuration after merging all layers. Paths are
/// deployment configuration; the engine only requires that they are
/// absolute in-app paths.
///
/// # Example
///
/// ```
/// use roost_runtime::config::GateConfig;
///
/// let config = GateConfig::default();
/// assert_eq!(config.login_path, "/login");
/// assert_eq!(config.redirect_param, "redirectTo");
/// assert_eq!(config.default_fallback, "/dashboard");
/// assert!(config.routes.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Unauthenticated entry path.
    pub login_path: String,

    /// Query parameter carrying the original path to the login page.
    pub redirect_param: String,

    /// Redirect target for denied rules without a `fallback_path`.
    pub default_fallback: String,

    /// Handling of absent or unrecognized role claims.
    pub unknown_role: UnknownRolePolicy,

    /// Timeout configuration.
    pub timeouts: TimeoutsConfig,

    /// Route table override. `None` selects the built-in table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<RouteRule>>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            redirect_param: "redirectTo".to_string(),
            default_fallback: "/dashboard".to_string(),
            unknown_role: UnknownRolePolicy::default(),
            timeouts: TimeoutsConfig::default(),
            routes: None,
        }
    }
}

impl GateConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Checks the values the gate depends on.
    ///
    /// Route rules are validated separately when the table is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, path) in [
            ("login_path", &self.login_path),
            ("default_fallback", &self.default_fallback),
        ] {
            if !is_local_path(path) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("'{path}' is not an absolute in-app path"),
                ));
            }
        }
        if self.login_path.contains('?') {
            return Err(ConfigError::invalid_value(
                "login_path",
                "must not carry a query string",
            ));
        }
        if self.redirect_param.is_empty()
            || !self
                .redirect_param
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::invalid_value(
                "redirect_param",
                format!("'{}' is not a plain query parameter name", self.redirect_param),
            ));
        }
        if self.timeouts.session_ms == 0 {
            return Err(ConfigError::invalid_value("timeouts.session_ms", "must be non-zero"));
        }
        if self.timeouts.oracle_ms == 0 {
            return Err(ConfigError::invalid_value("timeouts.oracle_ms", "must be non-zero"));
        }
        Ok(())
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Session resolution timeout in milliseconds. Default: 2000.
    pub session_ms: u64,

    /// Membership lookup timeout in milliseconds. Default: 2000.
    pub oracle_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            session_ms: 2_000,
            oracle_ms: 2_000,
        }
    }
}

impl TimeoutsConfig {
    /// Session resolution timeout.
    #[must_use]
    pub fn session(&self) -> Duration {
        Duration::from_millis(self.session_ms)
    }

    /// Membership lookup timeout.
    #[must_use]
    pub fn oracle(&self) -> Duration {
        Duration::from_millis(self.oracle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_auth::{Permission, ResourceType};

    #[test]
    fn default_config() {
        let config = GateConfig::default();
        assert_eq!(config.timeouts.session(), Duration::from_secs(2));
        assert_eq!(config.timeouts.oracle(), Duration::from_secs(2));
        assert_eq!(config.unknown_role, UnknownRolePolicy::LowestPrivilege);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = GateConfig::default();
        config.routes = Some(vec![
            RouteRule::public("/houses"),
            RouteRule::protected("/admin/:houseId")
                .requires(Permission::ManageHouse)
                .scoped_to(ResourceType::House),
        ]);
        let toml = config
            .to_toml()
            .expect("should serialize config to TOML");
        let restored = GateConfig::from_toml(&toml).expect("should deserialize roundtripped TOML");
        assert_eq!(config, restored);
    }

    #[test]
    fn toml_partial_parse() {
        let toml = r#"
default_fallback = "/home"
unknown_role = "deny"

[timeouts]
oracle_ms = 500
"#;
        let config = GateConfig::from_toml(toml).expect("should parse partial TOML with defaults");
        assert_eq!(config.default_fallback, "/home");
        assert_eq!(config.unknown_role, UnknownRolePolicy::Deny);
        assert_eq!(config.timeouts.oracle_ms, 500);
        // Defaults for unspecified fields
        assert_eq!(config.timeouts.session_ms, 2_000);
        assert_eq!(config.login_path, "/login");
    }

    #[test]
    fn toml_routes_keep_declared_order() {
        let toml = r#"
[[routes]]
path_pattern = "/admin/expansion"
required_permission = "manage_all_houses"

[[routes]]
path_pattern = "/admin/:houseId"
required_permission = "manage_house"
requires_resource_check = true
resource_type = "house"
"#;
        let config = GateConfig::from_toml(toml).unwrap();
        let routes = config.routes.unwrap();
        assert_eq!(routes[0].path_pattern, "/admin/expansion");
        assert_eq!(routes[1].resource_type, Some(ResourceType::House));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cases: Vec<(fn(&mut GateConfig), &str)> = vec![
            (|c| c.login_path = "login".into(), "login_path"),
            (|c| c.login_path = "/login?next=x".into(), "login_path"),
            (|c| c.default_fallback = "https://evil.example".into(), "default_fallback"),
            (|c| c.default_fallback = "//evil.example".into(), "default_fallback"),
            (|c| c.redirect_param = String::new(), "redirect_param"),
            (|c| c.redirect_param = "a=b".into(), "redirect_param"),
            (|c| c.timeouts.session_ms = 0, "timeouts.session_ms"),
            (|c| c.timeouts.oracle_ms = 0, "timeouts.oracle_ms"),
        ];
        for (mutate, field) in cases {
            let mut config = GateConfig::default();
            mutate(&mut config);
            match config.validate() {
                Err(ConfigError::InvalidValue { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidValue for {field}, got {other:?}"),
            }
        }
    }
}
