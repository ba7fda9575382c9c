//! Application configuration
//!
//! One YAML file per environment under `config/`, e.g. `config/dev.yaml`.
//! Every section except `exchange` may be omitted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// PostgreSQL URL for the transaction store. Absent = in-memory store.
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_exchange_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_exchange_timeout_ms() -> u64 {
    10_000
}

impl ExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Connection pool sizing for the transaction store
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_ms: 5_000,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    pub ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PricingConfig {
    /// Lifetime of a fallback quote
    pub quote_ttl_secs: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { quote_ttl_secs: 120 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReconcilerConfig {
    /// Deadline for the expired-order store lookup
    pub recovery_timeout_ms: u64,
    /// Pause before applying a recovery result
    pub settle_delay_ms: u64,
    /// Testing mode: orders are reported as successful and never written.
    pub simulate_success: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            recovery_timeout_ms: 2000,
            settle_delay_ms: 500,
            simulate_success: false,
        }
    }
}

impl ReconcilerConfig {
    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_millis(self.recovery_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollerConfig {
    pub interval_ms: u64,
    pub max_polls: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            max_polls: 720,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Client environment reported in the metadata snapshot of saved transactions
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub languages: Vec<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub platform: String,
    pub vendor: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("swapbridge/{}", env!("CARGO_PKG_VERSION")),
            languages: vec!["en-US".to_string()],
            viewport_width: 0,
            viewport_height: 0,
            platform: std::env::consts::OS.to_string(),
            vendor: String::new(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
