//! Target account settings.
//!
//! [`MigrationConfig`] is built once (usually by the CLI, from a TOML file
//! plus command-line overrides) and passed by reference into the rewriters.
//! Values are opaque strings; nothing here checks them against Snowflake.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::TARGET_HOST_SUFFIX;
use crate::error::{ConfigError, Result};

/// Snowflake account settings applied to every migrated connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Account identifier, e.g. `xy12345.us-east-1`.
    pub account: String,
    pub username: String,
    pub database: String,
    pub warehouse: String,
    pub schema: String,
    /// Role, written to the connection's `service` attribute.
    pub role: String,
}

impl MigrationConfig {
    /// Snowflake host for the configured account.
    pub fn host(&self) -> String {
        format!("{}{TARGET_HOST_SUFFIX}", self.account)
    }

    /// Initial SQL that selects the configured schema.
    pub fn initial_sql(&self) -> String {
        format!("USE SCHEMA {};", self.schema)
    }
}

/// Partially specified settings, as read from a config file or CLI flags.
///
/// ```toml
/// account = "xy12345.us-east-1"
/// username = "TABLEAU"
/// database = "ANALYTICS"
/// warehouse = "REPORTING_WH"
/// schema = "CORE"
/// role = "REPORTER"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ConfigFile {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of `self`; any value set in `overrides` wins.
    #[must_use]
    pub fn merge(self, overrides: ConfigFile) -> Self {
        Self {
            account: overrides.account.or(self.account),
            username: overrides.username.or(self.username),
            database: overrides.database.or(self.database),
            warehouse: overrides.warehouse.or(self.warehouse),
            schema: overrides.schema.or(self.schema),
            role: overrides.role.or(self.role),
        }
    }

    /// Produce a complete [`MigrationConfig`], failing on the first unset field.
    pub fn resolve(self) -> Result<MigrationConfig> {
        Ok(MigrationConfig {
            account: required(self.account, "account")?,
            username: required(self.username, "username")?,
            database: required(self.database, "database")?,
            warehouse: required(self.warehouse, "warehouse")?,
            schema: required(self.schema, "schema")?,
            role: required(self.role, "role")?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value.ok_or(ConfigError::MissingField { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ConfigFile {
        ConfigFile {
            account: Some("acme".to_string()),
            username: Some("loader".to_string()),
            database: Some("ANALYTICS".to_string()),
            warehouse: Some("WH".to_string()),
            schema: Some("CORE".to_string()),
            role: Some("REPORTER".to_string()),
        }
    }

    #[test]
    fn host_and_initial_sql() {
        let config = full().resolve().expect("resolve");
        assert_eq!(config.host(), "acme.snowflakecomputing.com");
        assert_eq!(config.initial_sql(), "USE SCHEMA CORE;");
    }

    #[test]
    fn overrides_win_field_by_field() {
        let overrides = ConfigFile {
            schema: Some("STAGING".to_string()),
            ..ConfigFile::default()
        };
        let merged = full().merge(overrides);
        assert_eq!(merged.schema.as_deref(), Some("STAGING"));
        assert_eq!(merged.account.as_deref(), Some("acme"));
    }

    #[test]
    fn resolve_reports_missing_field() {
        let partial = ConfigFile {
            warehouse: None,
            ..full()
        };
        let error = partial.resolve().expect_err("warehouse is missing");
        assert!(matches!(
            error,
            ConfigError::MissingField { field: "warehouse" }
        ));
    }

    #[test]
    fn empty_values_are_accepted() {
        let config = ConfigFile {
            role: Some(String::new()),
            ..full()
        }
        .resolve()
        .expect("empty role is still a value");
        assert_eq!(config.role, "");
    }

    #[test]
    fn load_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("migrate.toml");
        fs::write(&path, "account = \"acme\"\nschema = \"CORE\"\n").expect("write");
        let loaded = ConfigFile::load(&path).expect("load");
        assert_eq!(loaded.account.as_deref(), Some("acme"));
        assert_eq!(loaded.schema.as_deref(), Some("CORE"));
        assert!(loaded.role.is_none());
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("migrate.toml");
        fs::write(&path, "acount = \"typo\"\n").expect("write");
        let error = ConfigFile::load(&path).expect_err("unknown key");
        assert!(matches!(error, ConfigError::Toml { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = ConfigFile::load(&dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
