//! Configuration module for listsync
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LISTSYNC_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use listsync::config::SyncConfig;
//!
//! let toml = r#"
//! [remote]
//! site_url = "https://lists.example.com/sites/assets"
//! list_name = "Asset Inventory"
//!
//! [identity]
//! primary_field = "Title"
//! secondary_field = "SerialNumber"
//!
//! [mappings]
//! Title = "AssetTag"
//! SerialNumber = "SerialNumber"
//! "#;
//! let config: SyncConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.remote.list_name, "Asset Inventory");
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Remote site connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    /// Site URL of the hosted list-store.
    pub site_url: String,
    /// Name of the list to reconcile against.
    pub list_name: String,
}

/// The two remote fields used as the identity pair when matching rows
/// against existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub primary_field: String,
    pub secondary_field: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            primary_field: "Title".to_string(),
            secondary_field: "SerialNumber".to_string(),
        }
    }
}

/// Domain side rules applied during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Field whose value change signals an ownership transfer. Empty
    /// disables the ownership rule.
    pub ownership_change_field: String,
    /// Boolean field forced to `false` in the update payload when the
    /// ownership field changed.
    pub stale_flag_field: String,
    /// Field treated as a date even though its name doesn't end in "Date".
    pub due_date_field: String,
    /// Create a record when no match exists. When false, unmatched rows
    /// are reported as skipped instead (audit-only runs).
    pub create_missing: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            ownership_change_field: String::new(),
            stale_flag_field: String::new(),
            due_date_field: String::new(),
            create_missing: true,
        }
    }
}

/// Unified configuration for a reconciliation run.
///
/// Aggregates remote connection settings, the identity pair, domain rules,
/// the remote-field → CSV-column mapping table, and logging.
///
/// # Example
///
/// ```rust
/// use listsync::config::SyncConfig;
///
/// let config = SyncConfig::default();
/// assert!(config.rules.create_missing);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote site and list
    pub remote: RemoteConfig,
    /// Identity pair used for matching
    pub identity: IdentityConfig,
    /// Reconciliation side rules
    pub rules: RuleConfig,
    /// Remote field name → CSV column name. TOML has no null, so an empty
    /// string means "declared but unmapped — ignore for this run".
    pub mappings: BTreeMap<String, String>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports LISTSYNC_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(site_url) = std::env::var("LISTSYNC_SITE_URL") {
            self.remote.site_url = site_url;
        }
        if let Ok(list_name) = std::env::var("LISTSYNC_LIST_NAME") {
            self.remote.list_name = list_name;
        }

        if let Ok(level) = std::env::var("LISTSYNC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LISTSYNC_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// The identity pair is structurally required: both fields must appear
    /// in the mapping table with a non-empty CSV column, otherwise matching
    /// cannot function and the run must abort before any row is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.site_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "remote.site_url".to_string(),
                message: "site URL cannot be empty".to_string(),
            });
        }
        if self.remote.list_name.is_empty() {
            return Err(ConfigError::Validation {
                field: "remote.list_name".to_string(),
                message: "list name cannot be empty".to_string(),
            });
        }
        if self.mappings.is_empty() {
            return Err(ConfigError::Validation {
                field: "mappings".to_string(),
                message: "at least one field mapping is required".to_string(),
            });
        }

        for field in [&self.identity.primary_field, &self.identity.secondary_field] {
            match self.mappings.get(field) {
                Some(column) if !column.trim().is_empty() => {}
                _ => return Err(ConfigError::MissingMapping(field.clone())),
            }
        }

        if self.rules.ownership_change_field.is_empty() != self.rules.stale_flag_field.is_empty() {
            return Err(ConfigError::Validation {
                field: "rules".to_string(),
                message: "ownership_change_field and stale_flag_field must be set together"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Mapping table with empty columns normalized to `None`.
    pub fn field_mappings(&self) -> BTreeMap<String, Option<String>> {
        self.mappings
            .iter()
            .map(|(field, column)| {
                let column = column.trim();
                let column = if column.is_empty() {
                    None
                } else {
                    Some(column.to_string())
                };
                (field.clone(), column)
            })
            .collect()
    }

    /// CSV column configured for a remote field, if mapped.
    pub fn csv_column(&self, field: &str) -> Option<&str> {
        self.mappings
            .get(field)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}
