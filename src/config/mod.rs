//! Environment-driven configuration

use std::env;

/// Connection and bootstrap settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster hostname
    pub host: String,
    /// Cluster port (default: 9200)
    pub port: u16,
    /// Basic-auth username
    pub username: String,
    /// Basic-auth password
    pub password: String,
    /// Slack webhook URL for the notification destination
    pub webhook_url: String,
    /// Log indices the monitors query
    pub indices: Vec<String>,
    /// Accept invalid TLS certificates (default: false)
    pub insecure: bool,
}

impl Config {
    /// Load configuration from ALERTSEED_* environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = require("ALERTSEED_HOST")?;
        let port: u16 = env::var("ALERTSEED_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(9200);
        let username = require("ALERTSEED_USERNAME")?;
        let password = require("ALERTSEED_PASSWORD")?;
        let webhook_url = require("ALERTSEED_WEBHOOK_URL")?;
        let indices = parse_indices(&require("ALERTSEED_INDICES")?);
        if indices.is_empty() {
            return Err(ConfigError::EmptyIndices);
        }
        let insecure = env::var("ALERTSEED_INSECURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            username,
            password,
            webhook_url,
            indices,
            insecure,
        })
    }

    /// Base URL of the cluster's REST API
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Split a comma-separated index list, dropping empty entries
pub fn parse_indices(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("ALERTSEED_INDICES resolved to an empty index list")]
    EmptyIndices,
}
