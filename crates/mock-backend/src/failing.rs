//! Failing backend implementation - every request errors.

use async_trait::async_trait;
use chat_core::{BackendError, ChatBackend, HistoryRecord, PurchaseRecord};

/// A backend whose every request fails with a transport error.
///
/// Stands in for an unreachable server.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    reason: String,
}

impl FailingBackend {
    /// Create a backend failing with a generic connection error.
    pub fn new() -> Self {
        Self::with_reason("connection refused")
    }

    /// Create a backend failing with the given reason.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> BackendError {
        BackendError::Transport(self.reason.clone())
    }
}

impl Default for FailingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn fetch_history(&self, _user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        Err(self.error())
    }

    async fn send_message(&self, _user_key: &str, _content: &str) -> Result<String, BackendError> {
        Err(self.error())
    }

    async fn logout(&self, _user_key: &str) -> Result<(), BackendError> {
        Err(self.error())
    }

    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
        Err(self.error())
    }

    fn name(&self) -> &str {
        "FailingBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_fails() {
        let backend = FailingBackend::with_reason("down");

        let err = backend.send_message("u1", "hola").await.unwrap_err();
        assert_eq!(err.to_string(), "transport error: down");
        assert!(backend.fetch_history("u1").await.is_err());
        assert!(backend.logout("u1").await.is_err());
        assert!(backend.fetch_purchases().await.is_err());
    }
}
