//! Configuration management for the Tripsmith application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripsmithError;
use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Tripsmith application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripsmithConfig {
    /// Generative backend configuration
    pub generation: GenerationConfig,
    /// Durable store configuration
    pub store: StoreConfig,
    /// Reference document library configuration
    pub reference: ReferenceConfig,
    /// Web server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Generative backend configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Backend API key (optional for locally hosted backends)
    pub api_key: Option<String>,
    /// Base URL for the generative backend
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    /// Model identifier passed to the backend
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_generation_max_retries")]
    pub max_retries: u32,
}

/// Durable store configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory location
    #[serde(default = "default_store_location")]
    pub location: String,
}

/// Reference document library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Directory containing per-city reference documents
    #[serde(default = "default_reference_docs_dir")]
    pub docs_dir: String,
    /// Default locale used when a document is missing for the request locale
    #[serde(default = "default_reference_locale")]
    pub default_locale: String,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_generation_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_generation_model() -> String {
    "llama3.1".to_string()
}

fn default_generation_timeout() -> u32 {
    60
}

fn default_generation_max_retries() -> u32 {
    2
}

fn default_store_location() -> String {
    "~/.local/share/tripsmith/store".to_string()
}

fn default_reference_docs_dir() -> String {
    "reference_docs".to_string()
}

fn default_reference_locale() -> String {
    "en".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TripsmithConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                api_key: None,
                base_url: default_generation_base_url(),
                model: default_generation_model(),
                timeout_seconds: default_generation_timeout(),
                max_retries: default_generation_max_retries(),
            },
            store: StoreConfig {
                location: default_store_location(),
            },
            reference: ReferenceConfig {
                docs_dir: default_reference_docs_dir(),
                default_locale: default_reference_locale(),
            },
            server: ServerConfig {
                port: default_server_port(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl TripsmithConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRIPSMITH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TRIPSMITH")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripsmithConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripsmith").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.generation.base_url.is_empty() {
            self.generation.base_url = default_generation_base_url();
        }
        if self.generation.model.is_empty() {
            self.generation.model = default_generation_model();
        }
        if self.generation.timeout_seconds == 0 {
            self.generation.timeout_seconds = default_generation_timeout();
        }
        if self.store.location.is_empty() {
            self.store.location = default_store_location();
        }
        if self.reference.docs_dir.is_empty() {
            self.reference.docs_dir = default_reference_docs_dir();
        }
        if self.reference.default_locale.is_empty() {
            self.reference.default_locale = default_reference_locale();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_backend()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate generative backend settings
    pub fn validate_backend(&self) -> Result<()> {
        if let Some(api_key) = &self.generation.api_key {
            if api_key.is_empty() {
                return Err(TripsmithError::config(
                    "Backend API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        if !self.generation.base_url.starts_with("http://")
            && !self.generation.base_url.starts_with("https://")
        {
            return Err(TripsmithError::config(
                "Generative backend base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.generation.timeout_seconds > 300 {
            return Err(
                TripsmithError::config("Backend timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.generation.max_retries > 10 {
            return Err(TripsmithError::config("Backend max retries cannot exceed 10").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripsmithError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripsmithError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TripsmithConfig::default();
        assert_eq!(config.generation.base_url, "http://localhost:11434/v1");
        assert_eq!(config.generation.timeout_seconds, 60);
        assert_eq!(config.reference.default_locale, "en");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn test_config_validation_missing_api_key() {
        let config = TripsmithConfig::default();
        // API key is optional for locally hosted backends
        assert!(config.validate_backend().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = TripsmithConfig::default();
        config.generation.api_key = Some(String::new());
        assert!(config.validate_backend().is_err());
    }

    #[test]
    fn test_config_validation_invalid_base_url() {
        let mut config = TripsmithConfig::default();
        config.generation.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base URL"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripsmithConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripsmithConfig::default();
        config.generation.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_config_path_generation() {
        let path = TripsmithConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("tripsmith"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
