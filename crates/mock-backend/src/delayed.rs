//! Latency injection around another backend.

use std::time::Duration;

use chat_core::{async_trait, BackendError, ChatBackend, HistoryRecord, PurchaseRecord};
use tokio::time::sleep;

/// Sleeps before forwarding each request to `inner`.
///
/// Keeps a session in its `Sending` phase long enough for a test to act on it.
pub struct DelayedBackend<B: ChatBackend> {
    inner: B,
    delay: Duration,
}

impl<B: ChatBackend> DelayedBackend<B> {
    /// Forward to `inner` after `delay`.
    pub fn new(inner: B, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Forward to `inner` after `millis` milliseconds.
    pub fn with_millis(inner: B, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// The backend requests are forwarded to.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for DelayedBackend<B> {
    async fn fetch_history(&self, user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        sleep(self.delay).await;
        self.inner.fetch_history(user_key).await
    }

    async fn send_message(&self, user_key: &str, content: &str) -> Result<String, BackendError> {
        sleep(self.delay).await;
        self.inner.send_message(user_key, content).await
    }

    async fn logout(&self, user_key: &str) -> Result<(), BackendError> {
        sleep(self.delay).await;
        self.inner.logout(user_key).await
    }

    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
        sleep(self.delay).await;
        self.inner.fetch_purchases().await
    }

    fn name(&self) -> &str {
        "DelayedBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoBackend;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_backend() {
        let backend = DelayedBackend::with_millis(EchoBackend::new(), 100);

        let start = Instant::now();
        let reply = backend.send_message("u1", "test").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(reply, "test");
        assert!(elapsed >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_backend_name() {
        let backend = DelayedBackend::with_millis(EchoBackend::new(), 0);
        assert_eq!(backend.name(), "DelayedBackend");
        assert_eq!(backend.inner().name(), "EchoBackend");
    }
}
