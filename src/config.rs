use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Application configuration
/// In debug builds: loads from .env file
/// In release builds: loads from ~/.nishiki/config.env when present
///
/// Environment variables override both.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the inventory backend
    pub api_url: String,
    /// Signed-in user; `None` means imports are refused
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    /// Collection shown on startup
    pub collection_id: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration based on build mode
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(debug_assertions)]
        {
            if dotenvy::dotenv().is_ok() {
                info!("Dev mode activated - loaded .env file");
            } else {
                debug!("No .env file found, using environment only");
            }
        }

        #[cfg(not(debug_assertions))]
        {
            if let Some(path) = dirs::home_dir().map(|home| home.join(".nishiki/config.env")) {
                if dotenvy::from_path(&path).is_ok() {
                    info!("Loaded configuration from {}", path.display());
                } else {
                    debug!("No config file at {}", path.display());
                }
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup (the process environment in production)
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match non_empty("NISHIKI_REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    key: "NISHIKI_REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let config = Self {
            api_url: non_empty("NISHIKI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            user_id: non_empty("NISHIKI_USER_ID"),
            access_token: non_empty("NISHIKI_ACCESS_TOKEN"),
            collection_id: non_empty("NISHIKI_COLLECTION_ID"),
            request_timeout,
        };

        info!(
            "Using backend {} (user: {})",
            config.api_url,
            config.user_id.as_deref().unwrap_or("not signed in")
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.user_id, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_values_from_environment() {
        let config = load(&[
            ("NISHIKI_API_URL", "https://inventory.example.com"),
            ("NISHIKI_USER_ID", "user-1"),
            ("NISHIKI_COLLECTION_ID", "col-1"),
            ("NISHIKI_ACCESS_TOKEN", ""),
            ("NISHIKI_REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://inventory.example.com");
        assert_eq!(config.user_id.as_deref(), Some("user-1"));
        assert_eq!(config.collection_id.as_deref(), Some("col-1"));
        assert_eq!(config.access_token, None);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for value in ["soon", "0", "-3"] {
            let result = load(&[("NISHIKI_REQUEST_TIMEOUT_SECS", value)]);

            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue {
                    key: "NISHIKI_REQUEST_TIMEOUT_SECS",
                    ..
                })
            ));
        }
    }
}
