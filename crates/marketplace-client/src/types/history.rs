//! Types for stored chat history.

use chat_core::{HistoryRecord, HistoryTimestamp, Role};
use serde::Deserialize;

/// One item of `GET /api/chat/history/{userId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredExchange {
    /// What the user asked.
    #[serde(default)]
    pub prompt: String,

    /// The assistant's answer.
    #[serde(default)]
    pub resumen: String,

    /// When the exchange happened, if the server records it.
    #[serde(default, alias = "fecha", alias = "createdAt")]
    pub timestamp: Option<HistoryTimestamp>,
}

impl From<StoredExchange> for HistoryRecord {
    fn from(entry: StoredExchange) -> Self {
        HistoryRecord::Exchange {
            timestamp: entry.timestamp.as_ref().and_then(HistoryTimestamp::to_datetime),
            prompt: entry.prompt,
            reply: entry.resumen,
        }
    }
}

/// One item of `GET /v1/chat/history/{userId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredMessage {
    /// Server-side id. Not reused; the session assigns its own ids.
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    /// Author.
    pub role: Role,

    /// Message text.
    #[serde(default)]
    pub content: String,

    /// Creation time.
    #[serde(default)]
    pub timestamp: Option<HistoryTimestamp>,
}

impl From<StoredMessage> for HistoryRecord {
    fn from(entry: StoredMessage) -> Self {
        HistoryRecord::Message {
            timestamp: entry.timestamp.as_ref().and_then(HistoryTimestamp::to_datetime),
            role: entry.role,
            content: entry.content,
        }
    }
}
