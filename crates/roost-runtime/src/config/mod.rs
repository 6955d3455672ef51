//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! Configuration is loaded from multiple sources with priority-based merging:
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. Environment Variables (ROOST_*)      │  Runtime override
//! ├──────────────────────────────────────────┤
//! │  2. Explicit file (--config)             │  Operator choice
//! ├──────────────────────────────────────────┤
//! │  3. Project Config (.roost/config.toml)  │  Application-specific
//! ├──────────────────────────────────────────┤
//! │  4. Global Config (~/.roost/config.toml) │  Host defaults
//! ├──────────────────────────────────────────┤
//! │  5. Default Values (compile-time)        │  Fallback
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Route Rules in Config
//!
//! A `[[routes]]` list replaces the built-in table entirely. Rules are
//! never merged across layers: the highest layer that declares routes
//! owns the whole ordered list, because order decides matches.
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ROOST_LOGIN_PATH` | `login_path` | String |
//! | `ROOST_DEFAULT_FALLBACK` | `default_fallback` | String |
//! | `ROOST_SESSION_TIMEOUT_MS` | `timeouts.session_ms` | u64 > 0 |
//! | `ROOST_ORACLE_TIMEOUT_MS` | `timeouts.oracle_ms` | u64 > 0 |
//! | `ROOST_UNKNOWN_ROLE` | `unknown_role` | `lowest_privilege` \| `deny` |
//!
//! # Example Configuration
//!
//! ```toml
//! # .roost/config.toml
//!
//! login_path = "/login"
//! redirect_param = "redirectTo"
//! default_fallback = "/dashboard"
//! unknown_role = "lowest_privilege"
//!
//! [timeouts]
//! session_ms = 2000
//! oracle_ms = 2000
//!
//! [[routes]]
//! path_pattern = "/houses"
//! is_public = true
//!
//! [[routes]]
//! path_pattern = "/admin/:houseId/residents"
//! required_permission = "manage_residents"
//! requires_resource_check = true
//! resource_type = "house"
//! fallback_path = "/dashboard"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{GateConfig, TimeoutsConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".roost")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".roost";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
