//! Configuration types for marketplace-client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ClientError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which generation of the chat endpoints to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// `/v1/chat/...` endpoints. Deprecated.
    V1,
    /// `/api/chat...` endpoints.
    #[default]
    V2,
}

impl ApiVersion {
    /// Short name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// Whether this version is scheduled for removal on the server.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::V1)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" | "api" => Ok(Self::V2),
            other => Err(ClientError::Config(format!("unknown API version: {}", other))),
        }
    }
}

/// Configuration for connecting to the marketplace backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:5000").
    pub base_url: String,
    /// Chat endpoint generation.
    pub api_version: ApiVersion,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: ApiVersion::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Select the chat endpoint generation.
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the chat history URL for a user key.
    pub fn history_url(&self, user_key: &str) -> String {
        let encoded = urlencoding::encode(user_key);
        match self.api_version {
            ApiVersion::V1 => format!("{}/v1/chat/history/{}", self.base_url, encoded),
            ApiVersion::V2 => format!("{}/api/chat/history/{}", self.base_url, encoded),
        }
    }

    /// Get the send-message URL.
    pub fn message_url(&self) -> String {
        match self.api_version {
            ApiVersion::V1 => format!("{}/v1/chat/message", self.base_url),
            ApiVersion::V2 => format!("{}/api/chat", self.base_url),
        }
    }

    /// Get the logout URL. Only the `/api` generation has one.
    pub fn logout_url(&self) -> String {
        format!("{}/api/chat/logout", self.base_url)
    }

    /// Get the purchase history URL.
    pub fn purchases_url(&self) -> String {
        format!("{}/v1/drivers/Venta", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!(" V2 ".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://localhost:5000/");
        assert_eq!(config.base_url, "http://localhost:5000");
    }
}
