//! # Configuration
//!
//! Layered configuration built with the `config` crate:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`country-cache.toml`, or the path in
//!    `COUNTRY_CACHE_CONFIG`)
//! 3. environment variables prefixed with `COUNTRY_CACHE_`, levels separated
//!    by `__` (`COUNTRY_CACHE_SERVER__PORT=9000`)
//!
//! `.env` is loaded into the environment by the binary before this runs.

use crate::application::services::RefreshConfig;
use crate::domain::value_objects::CurrencyCode;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "country-cache.toml";
/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "COUNTRY_CACHE_CONFIG";
/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "COUNTRY_CACHE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// Upstream API settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourcesConfig {
    /// Country catalog endpoint.
    pub countries_url: String,
    /// Exchange-rate endpoint; the currency code is appended as a path segment.
    pub exchange_rate_url: String,
    /// Currency the rates are expressed in.
    pub base_currency: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Bound on concurrent rate requests.
    pub max_concurrent_requests: usize,
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// sqlx SQLite URL.
    pub database_url: String,
    /// Path of the summary image slot.
    pub image_path: String,
}

/// Refresh settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RefreshSettings {
    /// Output per person in local currency units.
    pub gdp_per_capita_factor: f64,
    /// Number of countries drawn on the summary image.
    pub summary_top_n: usize,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Server settings.
    pub server: ServerConfig,
    /// Upstream API settings.
    pub sources: SourcesConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Refresh settings.
    pub refresh: RefreshSettings,
    /// Logging settings.
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration from defaults, the config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Loads configuration using `path` as the optional config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value is invalid.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("sources.countries_url", "https://restcountries.com/v2/all")?
            .set_default("sources.exchange_rate_url", "https://open.er-api.com/v6/latest")?
            .set_default("sources.base_currency", "USD")?
            .set_default("sources.timeout_ms", 10_000)?
            .set_default("sources.max_concurrent_requests", 16)?
            .set_default("storage.database_url", "sqlite://countries.db")?
            .set_default("storage.image_path", "cache/summary.png")?
            .set_default("refresh.gdp_per_capita_factor", 1500.0)?
            .set_default("refresh.summary_top_n", 5)?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.countries_url.trim().is_empty() {
            return Err(ConfigError::Invalid("sources.countries_url is empty".into()));
        }
        if self.sources.exchange_rate_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sources.exchange_rate_url is empty".into(),
            ));
        }
        self.base_currency()?;
        if self.sources.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "sources.max_concurrent_requests must be at least 1".into(),
            ));
        }
        let factor = self.refresh.gdp_per_capita_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "refresh.gdp_per_capita_factor must be positive, got {factor}"
            )));
        }
        Ok(())
    }

    /// Parsed base currency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the code is not three letters.
    pub fn base_currency(&self) -> Result<CurrencyCode, ConfigError> {
        CurrencyCode::new(&self.sources.base_currency)
            .map_err(|e| ConfigError::Invalid(format!("sources.base_currency: {e}")))
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }

    /// Refresh service settings.
    #[must_use]
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig::default()
            .with_gdp_per_capita_factor(self.refresh.gdp_per_capita_factor)
            .with_summary_top_n(self.refresh.summary_top_n)
    }
}
