//! The backend trait definition.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::history::HistoryRecord;
use crate::purchase::PurchaseRecord;

/// A remote service the UserHome view talks to.
///
/// Abstracted to support different transports (the marketplace HTTP API,
/// in-memory doubles for tests, etc.). Implementations report failures as
/// [`BackendError`]; deciding which failures are absorbed is left to the
/// session layer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetch the stored conversation for a user key.
    async fn fetch_history(&self, user_key: &str) -> Result<Vec<HistoryRecord>, BackendError>;

    /// Send a chat message and return the assistant's reply text.
    ///
    /// # Arguments
    /// * `user_key` - The user's id, or email when the id is empty
    /// * `content` - Trimmed message content
    async fn send_message(&self, user_key: &str, content: &str) -> Result<String, BackendError>;

    /// Notify the service that the user's session is over.
    async fn logout(&self, user_key: &str) -> Result<(), BackendError>;

    /// Fetch the purchase history rows.
    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError>;

    /// Name of this backend, for logging.
    fn name(&self) -> &str;
}
