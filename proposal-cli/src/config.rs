//! Layered configuration for the `proposal` binary.
//!
//! Values are resolved in this order, later layers winning:
//!
//! 1. built-in defaults (`sqlite` backend on `proposals.db`, 0% tax)
//! 2. the TOML file passed with `--config`
//! 3. command-line flags
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "proposals.db"
//!
//! [quotation]
//! tax_percent = "13.8"
//! ```
//!
//! Every key is optional; a missing key keeps the default.

use std::path::Path;

use proposal_core::db::DbConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_DATABASE: &str = "proposals.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tax percent must not be negative, got {0}")]
    NegativeTax(Decimal),
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DbConfig,
    pub tax_percent: Decimal,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig {
                backend: DEFAULT_BACKEND.to_string(),
                connection_string: DEFAULT_DATABASE.to_string(),
            },
            tax_percent: Decimal::ZERO,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub tax_percent: Option<Decimal>,
}

// On-disk shape; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    database: DatabaseSection,
    quotation: QuotationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DatabaseSection {
    backend: Option<String>,
    connection_string: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct QuotationSection {
    tax_percent: Option<Decimal>,
}

impl AppConfig {
    /// Defaults overlaid with the TOML document `input`.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        let mut config = Self::default();
        if let Some(backend) = file.database.backend {
            config.database.backend = backend;
        }
        if let Some(connection_string) = file.database.connection_string {
            config.database.connection_string = connection_string;
        }
        if let Some(tax_percent) = file.quotation.tax_percent {
            config.tax_percent = tax_percent;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), backend = %config.database.backend, "config file loaded");
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(connection_string) = overrides.connection_string {
            self.database.connection_string = connection_string;
        }
        if let Some(tax_percent) = overrides.tax_percent {
            self.tax_percent = tax_percent;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_percent.is_sign_negative() && !self.tax_percent.is_zero() {
            return Err(ConfigError::NegativeTax(self.tax_percent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn file_values_replace_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            connection_string = "/var/lib/proposals/live.db"

            [quotation]
            tax_percent = "13.8"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "/var/lib/proposals/live.db");
        assert_eq!(config.tax_percent, dec!(13.8));
    }

    #[test]
    fn numeric_tax_percent_is_accepted() {
        let config = AppConfig::from_toml("[quotation]\ntax_percent = 18\n").unwrap();

        assert_eq!(config.tax_percent, dec!(18));
    }

    #[test]
    fn flags_override_file() {
        let config = AppConfig::from_toml("[database]\nbackend = \"sqlite\"\n")
            .unwrap()
            .with_overrides(Overrides {
                backend: Some("memory".to_string()),
                connection_string: None,
                tax_percent: Some(dec!(5)),
            })
            .unwrap();

        assert_eq!(config.database.backend, "memory");
        assert_eq!(config.database.connection_string, "proposals.db");
        assert_eq!(config.tax_percent, dec!(5));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[database]\nbakend = \"sqlite\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn negative_tax_is_rejected() {
        assert!(matches!(
            AppConfig::default().with_overrides(Overrides {
                tax_percent: Some(dec!(-1)),
                ..Overrides::default()
            }),
            Err(ConfigError::NegativeTax(_))
        ));
    }

    #[test]
    fn missing_path_is_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
