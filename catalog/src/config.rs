//! Configuration for the catalog client.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variable overrides, then validation.
//!
//! | Variable                       | Field                            |
//! |--------------------------------|----------------------------------|
//! | `CATALOG_API_URL`              | `api.base_url`                   |
//! | `CATALOG_SUPPLIER_CONCURRENCY` | `api.supplier_concurrency`       |
//! | `CATALOG_LOG_LEVEL`            | `observability.log_level`        |
//!
//! # Example
//!
//! ```
//! use catalog::config::CatalogConfig;
//!
//! let text = r#"
//!     [api]
//!     base_url = "http://localhost:3000/api/"
//!     supplier_concurrency = 4
//! "#;
//! let config = CatalogConfig::from_toml_str_with(text, |_| None).unwrap();
//!
//! assert_eq!(config.api.supplier_concurrency, 4);
//! assert_eq!(config.api.products_path, "products/");
//! ```

use catalog_core::CatalogError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {reason}")]
    ReadFailed {
        /// File that failed
        path: String,
        /// Underlying I/O error
        reason: String,
    },
    /// Configuration text is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
    /// An environment override has an invalid value
    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for CatalogError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined to
    pub base_url: String,
    /// Path of the product collection
    pub products_path: String,
    /// Path prefix of supplier resources; the supplier id is appended
    pub suppliers_path: String,
    /// Path of the category collection
    pub categories_path: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum supplier lookups in flight for one selected product
    pub supplier_concurrency: usize,
}

impl ApiConfig {
    /// Validate API configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.products_path.is_empty() {
            return Err(ConfigError::ValidationError("products_path cannot be empty".to_string()));
        }
        if self.suppliers_path.is_empty() {
            return Err(ConfigError::ValidationError("suppliers_path cannot be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.supplier_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "supplier_concurrency must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Path of one supplier resource.
    #[must_use]
    pub fn supplier_path(&self, id: catalog_core::SupplierId) -> String {
        format!("{}{id}", self.suppliers_path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200/api/".to_string(),
            products_path: "products/".to_string(),
            suppliers_path: "suppliers/".to_string(),
            categories_path: "productCategories/".to_string(),
            request_timeout_secs: 30,
            supplier_concurrency: 8,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl ObservabilityConfig {
    /// Validate observability configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid log_level: {}. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Catalog client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl CatalogConfig {
    /// Defaults plus environment overrides, validated.
    ///
    /// # Errors
    ///
    /// Returns error if an override is malformed or the result is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text over the defaults, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid TOML for this schema, an
    /// override is malformed, or the result is invalid
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str_with(text, |var| std::env::var(var).ok())
    }

    /// Parse TOML text over the defaults, then apply overrides from `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogConfig::from_toml_str`]
    pub fn from_toml_str_with<F>(text: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config: Self =
            toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`CatalogConfig::from_toml_str`] fails
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric override does not parse
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(url) = lookup("CATALOG_API_URL") {
            self.api.base_url = url;
        }

        if let Some(value) = lookup("CATALOG_SUPPLIER_CONCURRENCY") {
            self.api.supplier_concurrency =
                value.parse().map_err(|_| ConfigError::InvalidEnvVar {
                    var: "CATALOG_SUPPLIER_CONCURRENCY",
                    value: value.clone(),
                })?;
        }

        if let Some(level) = lookup("CATALOG_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        Ok(())
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns the first validation failure
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}
