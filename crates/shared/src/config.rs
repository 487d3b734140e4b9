//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Exchange-rate provider and cache configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Settlement workflow configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Exchange-rate provider and cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the live rate provider.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of `(base, target, date)` entries kept in the cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Time-to-live for cached rates in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            timeout_secs: default_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_provider_url() -> String {
    "https://api.frankfurter.dev/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_capacity() -> u64 {
    1024
}

fn default_cache_ttl_secs() -> u64 {
    86400 // historical rates never change; one day bounds memory only
}

/// What to do when a transaction needs conversion but no rate is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionFailurePolicy {
    /// Refuse to record the transaction.
    Reject,
    /// Record the transaction with null conversion fields.
    #[default]
    StoreUnconverted,
}

/// Settlement workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Re-verify remaining shares against confirmed items before confirming.
    #[serde(default = "default_verify_on_confirm")]
    pub verify_on_confirm: bool,
    /// Policy applied when recording a transaction whose conversion fails.
    #[serde(default)]
    pub conversion_failure: ConversionFailurePolicy,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            verify_on_confirm: default_verify_on_confirm(),
            conversion_failure: ConversionFailurePolicy::default(),
        }
    }
}

fn default_verify_on_confirm() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "duet=info".to_string()
}

impl AppConfig {
    /// Loads configuration from `.env`, config files, and the environment.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default.toml`, `config/{RUN_MODE}.toml`, `DUET__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DUET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
