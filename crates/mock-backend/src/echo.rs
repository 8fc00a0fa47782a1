//! A stand-in assistant that answers with the user's own words.

use async_trait::async_trait;
use chat_core::{BackendError, ChatBackend, HistoryRecord, PurchaseRecord};

/// Answers every chat message with its content, optionally prefixed.
///
/// Has no stored history or purchases and accepts every logout.
#[derive(Debug, Clone, Default)]
pub struct EchoBackend {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBackend {
    /// Reply with the message content unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `prefix` in front of every reply.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_backend::EchoBackend;
    ///
    /// let backend = EchoBackend::with_prefix("Echo: ");
    /// // "precio?" is answered with "Echo: precio?"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn fetch_history(&self, _user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        Ok(Vec::new())
    }

    async fn send_message(&self, _user_key: &str, content: &str) -> Result<String, BackendError> {
        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, content),
            None => content.to_string(),
        })
    }

    async fn logout(&self, _user_key: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "EchoBackend"
    }
}
