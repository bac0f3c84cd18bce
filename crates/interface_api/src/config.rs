//! API configuration
//!
//! Read from `FREIGHT_`-prefixed environment variables, e.g.
//! `FREIGHT_PORT=9000` or `FREIGHT_BUSINESS_TIMEZONE=Asia/Kolkata`.
//! Anything unset falls back to [`ApiConfig::default`].

use std::time::Duration;

use serde::Deserialize;

use domain_receipts::HttpBlobStoreConfig;
use infra_db::DatabaseConfig;

/// API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    pub db_max_connections: u32,
    /// Log level or `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// IANA name of the timezone that defines "today" for load listings
    pub business_timezone: String,
    pub blob_store_url: String,
    #[serde(default)]
    pub blob_store_api_key: Option<String>,
    pub blob_store_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/freight".to_string(),
            db_max_connections: 10,
            log_level: "info".to_string(),
            log_json: false,
            business_timezone: "Asia/Kolkata".to_string(),
            blob_store_url: "http://localhost:8090".to_string(),
            blob_store_api_key: None,
            blob_store_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment, on top of the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?
            .set_default("database_url", defaults.database_url)?
            .set_default("db_max_connections", defaults.db_max_connections)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .set_default("business_timezone", defaults.business_timezone)?
            .set_default("blob_store_url", defaults.blob_store_url)?
            .set_default("blob_store_timeout_secs", defaults.blob_store_timeout_secs)?
            .add_source(config::Environment::with_prefix("FREIGHT").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(30))
    }

    pub fn blob_store(&self) -> HttpBlobStoreConfig {
        HttpBlobStoreConfig {
            base_url: self.blob_store_url.clone(),
            api_key: self.blob_store_api_key.clone(),
            timeout_secs: self.blob_store_timeout_secs,
        }
    }
}
