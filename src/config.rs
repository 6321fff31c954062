use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: String,
    pub dashboard_api_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        // .env is only read when explicitly requested
        if env::var("USE_DOTENV").ok().as_deref() == Some("true") {
            dotenv::dotenv().ok();
        }

        let config = Config {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://cluster-inventory.db?mode=rwc".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            log_level: env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string()),
            dashboard_api_url: env::var("DASHBOARD_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            poll_interval_secs: parse_var("DASHBOARD_POLL_INTERVAL_SECS", 5)?,
            request_timeout_secs: parse_var("DASHBOARD_REQUEST_TIMEOUT_SECS", 10)?,
        };

        Ok(config)
    }

    /// Full inventory snapshot endpoint polled by the dashboard.
    pub fn snapshot_url(&self) -> String {
        format!("{}/api/clusters", self.dashboard_api_url.trim_end_matches('/'))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}
