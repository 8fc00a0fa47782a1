//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use marketplace_client::{ApiVersion, ClientConfig, DEFAULT_BASE_URL};

/// Default directory holding the identity record.
pub const DEFAULT_STATE_DIR: &str = ".marketplace";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// UserHome client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Marketplace backend base URL.
    pub api_url: String,
    /// Endpoint generation to talk to.
    pub api_version: ApiVersion,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Directory of the persisted identity record.
    pub state_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `MARKETPLACE_API_URL` | Backend base URL | `http://localhost:5000` |
    /// | `MARKETPLACE_API_VERSION` | `v1` or `v2` | `v2` |
    /// | `MARKETPLACE_TIMEOUT_SECS` | HTTP timeout in seconds | `30` |
    /// | `USER_HOME_STATE_DIR` | Directory of the identity record | `.marketplace` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = get("MARKETPLACE_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let api_version = match get("MARKETPLACE_API_VERSION") {
            Some(raw) => parse_api_version(&raw)?,
            None => defaults.api_version,
        };

        let timeout = match get("MARKETPLACE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => defaults.timeout,
        };

        let state_dir = get("USER_HOME_STATE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.state_dir);

        Ok(Self {
            api_url,
            api_version,
            timeout,
            state_dir,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        api_version: Option<&str>,
        state_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(raw) = api_version {
            self.api_version = parse_api_version(raw)?;
        }
        if let Some(dir) = state_dir {
            self.state_dir = dir;
        }
        Ok(self)
    }

    /// HTTP client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_api_version(self.api_version)
            .with_timeout(self.timeout)
    }
}

fn parse_api_version(raw: &str) -> Result<ApiVersion, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidApiVersion(raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid MARKETPLACE_API_VERSION {0:?}, expected v1 or v2")]
    InvalidApiVersion(String),

    #[error("Invalid MARKETPLACE_TIMEOUT_SECS {0:?}, expected a positive number of seconds")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.api_version, ApiVersion::V2);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.state_dir, PathBuf::from(".marketplace"));
    }

    #[test]
    fn test_reads_environment() {
        let config = Config::from_lookup(lookup(&[
            ("MARKETPLACE_API_URL", "https://api.example.com/"),
            ("MARKETPLACE_API_VERSION", "v1"),
            ("MARKETPLACE_TIMEOUT_SECS", "5"),
            ("USER_HOME_STATE_DIR", "/tmp/home"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com/");
        assert_eq!(config.api_version, ApiVersion::V1);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/home"));
        assert_eq!(config.client_config().base_url, "https://api.example.com");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("MARKETPLACE_API_VERSION", "v9")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiVersion(_)));

        let err = Config::from_lookup(lookup(&[("MARKETPLACE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://127.0.0.1:9000".to_string()), Some("v1"), None)
            .unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_version, ApiVersion::V1);
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
    }
}
