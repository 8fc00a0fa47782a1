//! Types for sending chat messages.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/chat/message`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct V1MessageRequest {
    /// The message text.
    pub message: String,
    /// User key.
    pub user_id: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct V2ChatRequest {
    /// The message text.
    pub prompt: String,
    /// User key.
    pub user_id: String,
}

/// Body of `POST /api/chat/logout`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// User key.
    pub user_id: String,
}

/// Reply to a sent message (both generations).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text.
    pub response: String,
}
