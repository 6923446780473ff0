use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/snapshot.json";
pub const DEFAULT_STORE_NAME: &str = "EL FAGER Store";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// JSON snapshot seeding the in-memory store.
    pub snapshot_path: PathBuf,
    /// Optional permission table override.
    pub permissions_path: Option<PathBuf>,
    pub store_name: String,
    /// Link inserted into operator notifications.
    pub dashboard_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            address: get("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            snapshot_path: get("SNAPSHOT_PATH")
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string())
                .into(),
            permissions_path: get("PERMISSIONS_PATH").map(PathBuf::from),
            store_name: get("STORE_NAME").unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
            dashboard_url: get("DASHBOARD_URL").unwrap_or_default(),
        })
    }
}
