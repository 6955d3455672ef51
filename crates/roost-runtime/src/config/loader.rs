//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.roost/config.toml`)
//! 3. Project config (`.roost/config.toml`)
//! 4. Environment variables (`ROOST_*`)
//!
//! Files are merged key by key before they are deserialized: a key a
//! later file writes replaces the earlier value, even when it spells the
//! compile-time default. Nested tables (`[timeouts]`) merge per key;
//! arrays (`[[routes]]`) are replaced whole. The merged result is
//! validated before it is returned.

use super::{default_config_path, ConfigError, GateConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE};
use roost_auth::UnknownRolePolicy;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing typed environment variables.
macro_rules! parse_env {
    ($field:expr, $var:literal, $parse:expr, $expected:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = $parse(&val).ok_or_else(|| ConfigError::invalid_env_var($var, $expected))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```ignore
/// use roost_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/app")
///     .skip_env_vars()  // For testing
///     .load()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.roost/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    /// Explicit config file, layered after the project config.
    explicit_path: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,

    /// Skip project config loading.
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.roost/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Adds an explicit config file on top of the project config.
    ///
    /// Unlike the global and project files, this one must exist.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be parsed,
    /// if an environment override is malformed, or if the merged result
    /// fails [`GateConfig::validate`]. Missing global and project files
    /// are silently ignored.
    pub fn load(&self) -> Result<GateConfig, ConfigError> {
        let mut merged = toml::Table::new();
        let mut last_path: Option<PathBuf> = None;

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(layer) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                merge_layer(&mut merged, layer);
                last_path = Some(global_path);
            }
        }

        // Layer 2: Project config
        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(layer) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    merge_layer(&mut merged, layer);
                    last_path = Some(project_config_path);
                }
            }
        }

        // Layer 3: Explicit file
        if let Some(ref path) = self.explicit_path {
            let layer = self.load_file(path)?.ok_or_else(|| {
                ConfigError::read_file(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                )
            })?;
            debug!(path = %path.display(), "Loaded explicit config");
            merge_layer(&mut merged, layer);
            last_path = Some(path.clone());
        }

        let mut config: GateConfig = match last_path {
            None => GateConfig::default(),
            Some(path) => toml::Value::Table(merged)
                .try_into()
                .map_err(|e| ConfigError::parse_toml(path, e))?,
        };

        // Layer 4: Environment variables
        if !self.skip_env {
            self.apply_env_vars(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads a config file as a raw table, returning None if it doesn't exist.
    ///
    /// The file is also checked against [`GateConfig`] on its own, so that
    /// type errors name the file they come from.
    fn load_file(&self, path: &Path) -> Result<Option<toml::Table>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        GateConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;
        let table = content
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(table))
    }

    /// Applies environment variable overrides.
    fn apply_env_vars(&self, config: &mut GateConfig) -> Result<(), ConfigError> {
        // Millisecond environment variables
        parse_env!(
            config.timeouts.session_ms,
            "ROOST_SESSION_TIMEOUT_MS",
            parse_millis,
            "expected a positive number of milliseconds"
        );
        parse_env!(
            config.timeouts.oracle_ms,
            "ROOST_ORACLE_TIMEOUT_MS",
            parse_millis,
            "expected a positive number of milliseconds"
        );

        parse_env!(
            config.unknown_role,
            "ROOST_UNKNOWN_ROLE",
            UnknownRolePolicy::parse,
            "expected 'lowest_privilege' or 'deny'"
        );

        // Path environment variables
        if let Ok(val) = std::env::var("ROOST_LOGIN_PATH") {
            config.login_path = val;
        }
        if let Ok(val) = std::env::var("ROOST_DEFAULT_FALLBACK") {
            config.default_fallback = val;
        }

        Ok(())
    }
}

/// Writes every key of `layer` over `base`. Tables merge recursively;
/// any other value, arrays included, replaces the previous one.
fn merge_layer(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_layer(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Parses a non-zero millisecond count.
fn parse_millis(s: &str) -> Option<u64> {
    s.trim().parse::<u64>().ok().filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn load_global_config() {
        let temp = TempDir::new().unwrap();
        let config_path = create_config_file(
            temp.path(),
            r#"
login_path = "/signin"

[timeouts]
oracle_ms = 250
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&config_path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.timeouts.oracle_ms, 250);
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();

        // Create .roost directory in project
        let roost_dir = project_temp.path().join(".roost");
        std::fs::create_dir_all(&roost_dir).unwrap();

        // Global config
        let global_path = create_config_file(
            global_temp.path(),
            r#"
login_path = "/signin"
default_fallback = "/home"
"#,
        );

        // Project config
        create_config_file(
            &roost_dir,
            r#"
default_fallback = "/overview"

[[routes]]
path_pattern = "/houses"
is_public = true
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        // login_path from global (not overridden in project)
        assert_eq!(config.login_path, "/signin");
        // fallback from project (overrides global)
        assert_eq!(config.default_fallback, "/overview");
        assert_eq!(config.routes.map(|r| r.len()), Some(1));
    }

    #[test]
    fn later_layer_can_restore_a_default() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();
        let roost_dir = project_temp.path().join(".roost");
        std::fs::create_dir_all(&roost_dir).unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
login_path = "/signin"
unknown_role = "deny"

[timeouts]
session_ms = 900
oracle_ms = 400
"#,
        );
        create_config_file(
            &roost_dir,
            r#"
login_path = "/login"
unknown_role = "lowest_privilege"

[timeouts]
oracle_ms = 2000
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config.unknown_role, UnknownRolePolicy::LowestPrivilege);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.timeouts.oracle_ms, 2_000);
        // Untouched nested key survives from the global layer.
        assert_eq!(config.timeouts.session_ms, 900);
    }

    #[test]
    fn merge_layer_replaces_arrays_whole() {
        let mut base: toml::Table = r#"
login_path = "/signin"
routes = [{ path_pattern = "/a", is_public = true }, { path_pattern = "/b", is_public = true }]
"#
        .parse()
        .unwrap();
        let layer: toml::Table = r#"routes = [{ path_pattern = "/c", is_public = true }]"#
            .parse()
            .unwrap();

        merge_layer(&mut base, layer);

        let config: GateConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.routes, Some(vec![roost_auth::RouteRule::public("/c")]));
    }

    #[test]
    fn type_error_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), r#"unknown_role = "sometimes""#);
        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { path: ref p, .. } if *p == path));
    }

    #[test]
    fn missing_config_files_ok() {
        let config = ConfigLoader::new()
            .with_global_config("/nonexistent/path/config.toml")
            .with_project_root("/nonexistent/project")
            .skip_env_vars()
            .load()
            .unwrap();

        // Should return defaults
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn explicit_file_must_exist() {
        let err = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .with_config_file("/nonexistent/roost.toml")
            .skip_env_vars()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), "login_path = [");
        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn merged_result_is_validated() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), r#"default_fallback = "dashboard""#);
        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "default_fallback",
                ..
            }
        ));
    }

    #[test]
    fn parse_millis_values() {
        assert_eq!(parse_millis("1500"), Some(1500));
        assert_eq!(parse_millis(" 20 "), Some(20));
        assert_eq!(parse_millis("0"), None);
        assert_eq!(parse_millis("-5"), None);
        assert_eq!(parse_millis("2s"), None);
    }

    #[test]
    fn env_var_override() {
        // Env vars are process-global; every ROOST_* case lives in this one test.
        std::env::set_var("ROOST_LOGIN_PATH", "/auth/login");
        std::env::set_var("ROOST_ORACLE_TIMEOUT_MS", "300");
        std::env::set_var("ROOST_UNKNOWN_ROLE", "deny");

        let loader = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config();
        let overridden = loader.load();

        std::env::set_var("ROOST_SESSION_TIMEOUT_MS", "soon");
        let garbage = loader.load();

        // Cleanup
        for var in [
            "ROOST_LOGIN_PATH",
            "ROOST_ORACLE_TIMEOUT_MS",
            "ROOST_UNKNOWN_ROLE",
            "ROOST_SESSION_TIMEOUT_MS",
        ] {
            std::env::remove_var(var);
        }

        let config = overridden.unwrap();
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.timeouts.oracle_ms, 300);
        assert_eq!(config.unknown_role, UnknownRolePolicy::Deny);

        assert!(matches!(
            garbage,
            Err(ConfigError::InvalidEnvVar { ref name, .. }) if name == "ROOST_SESSION_TIMEOUT_MS"
        ));
    }
}
