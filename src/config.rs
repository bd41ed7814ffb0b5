//! Configuration management for `WeatherDeck`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherDeckError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the provider key
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Environment override for `api.api_key`, read directly when the file fails to load
pub const API_KEY_OVERRIDE_ENV: &str = "WEATHERDECK_API__API_KEY";

/// Smallest forecast day count the user can pick
pub const MIN_FORECAST_DAYS: u8 = 1;
/// Largest forecast day count the user can pick
pub const MAX_FORECAST_DAYS: u8 = 2;

/// Root configuration structure for `WeatherDeck`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherDeckConfig {
    /// Weather API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Memoization settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default session settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Provider key; falls back to `WEATHER_API_KEY`
    pub api_key: Option<String>,
    /// Base URL the endpoint paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Memoization settings for search and forecast lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
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

/// Default session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Forecast days selected when the session starts
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_cache_ttl() -> u32 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_forecast_days() -> u8 {
    MIN_FORECAST_DAYS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
        }
    }
}

impl WeatherDeckConfig {
    /// Load configuration from `config_path`, or the default file location when `None`,
    /// layered under environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("weatherdeck.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERDECK_API__BASE_URL, WEATHERDECK_LOGGING__LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("WEATHERDECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: WeatherDeckConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.api.api_key.is_none() {
            config.api.api_key = env::var(API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus whichever key the environment supplies
    #[must_use]
    pub fn from_environment() -> Self {
        Self::with_api_key_from(|name| env::var(name).ok())
    }

    fn with_api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.api.api_key = [API_KEY_OVERRIDE_ENV, API_KEY_ENV]
            .into_iter()
            .find_map(|name| lookup(name).filter(|key| !key.trim().is_empty()));
        config
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherdeck").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self
            .api
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.api.api_key = None;
        }
        if self.api.base_url.is_empty() {
            self.api.base_url = default_base_url();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.forecast_days == 0 {
            self.defaults.forecast_days = default_forecast_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.cache.ttl_minutes > 1440 {
            return Err(WeatherDeckError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into());
        }

        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&self.defaults.forecast_days) {
            return Err(WeatherDeckError::config(format!(
                "Default forecast days must be between {MIN_FORECAST_DAYS} and {MAX_FORECAST_DAYS}, got {}",
                self.defaults.forecast_days
            ))
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherDeckError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherDeckError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(
                WeatherDeckError::config("Weather API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}
