//! Service configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # catalog = "catalog.toml"  # Catalog file; omit to serve the built-in catalog
//!
//! [server]
//! bind = "127.0.0.1:8080"     # Listen address
//!
//! [api]
//! products_page_size = 9      # Default `limit` for /api/products
//! projects_page_size = 6      # Default `limit` for /api/projects
//! max_limit = 100             # Largest accepted `limit`
//! products_delay_ms = 0       # Artificial latency before answering (0 = off)
//! projects_delay_ms = 0
//!
//! [logging]
//! level = "info"              # trace | debug | info | warn | error
//! json = false                # One JSON object per log line
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [api]
//! products_delay_ms = 500
//! ```
//!
//! Unknown keys are rejected to catch typos early. `RUST_LOG`, when set,
//! takes precedence over `logging.level`.

use crate::params::{DEFAULT_MAX_LIMIT, ListDefaults, PRODUCTS_PAGE_SIZE, PROJECTS_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Service configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Catalog file to serve instead of the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind must be an address like 127.0.0.1:8080, got '{}'",
                self.server.bind
            )));
        }
        if self.api.products_page_size == 0 || self.api.projects_page_size == 0 {
            return Err(ConfigError::Validation(
                "api page sizes must be at least 1".into(),
            ));
        }
        if self.api.max_limit < self.api.products_page_size.max(self.api.projects_page_size) {
            return Err(ConfigError::Validation(
                "api.max_limit must not be smaller than the page sizes".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// List endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub products_page_size: usize,
    pub projects_page_size: usize,
    pub max_limit: usize,
    /// Sleep before answering a products request. Only affects latency.
    pub products_delay_ms: u64,
    pub projects_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            products_page_size: PRODUCTS_PAGE_SIZE,
            projects_page_size: PROJECTS_PAGE_SIZE,
            max_limit: DEFAULT_MAX_LIMIT,
            products_delay_ms: 0,
            projects_delay_ms: 0,
        }
    }
}

impl ApiConfig {
    pub fn products_defaults(&self) -> ListDefaults {
        ListDefaults {
            page_size: self.products_page_size,
            max_limit: self.max_limit,
        }
    }

    pub fn projects_defaults(&self) -> ListDefaults {
        ListDefaults {
            page_size: self.projects_page_size,
            max_limit: self.max_limit,
        }
    }

    pub fn products_delay(&self) -> Duration {
        Duration::from_millis(self.products_delay_ms)
    }

    pub fn projects_delay(&self) -> Duration {
        Duration::from_millis(self.projects_delay_ms)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# glass-catalog configuration
# ===========================
#
# Every key is optional. Values shown are the built-in defaults; delete
# anything you do not want to change. Unknown keys are rejected.

# Catalog file to serve. When omitted, the catalog compiled into the binary
# is used. The file holds [[products]] and [[projects]] tables.
# catalog = "catalog.toml"

# ---------------------------------------------------------------------------
# HTTP listener
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:8080"

# ---------------------------------------------------------------------------
# List endpoints (/api/products, /api/projects)
# ---------------------------------------------------------------------------
[api]
# Page size used when a request has no usable `limit`.
products_page_size = 9
projects_page_size = 6

# Requests asking for more than this many records per page get this many.
max_limit = 100

# Artificial latency in milliseconds, for exercising loading states in a
# front end. 0 disables it. Typical development values: 500 and 300.
products_delay_ms = 0
projects_delay_ms = 0

# ---------------------------------------------------------------------------
# Logging (RUST_LOG overrides `level` when set)
# ---------------------------------------------------------------------------
[logging]
level = "info"
json = false
"##
}
