//! Wire types for the marketplace API.

mod chat;
mod history;

pub use chat::{ChatReply, LogoutRequest, V1MessageRequest, V2ChatRequest};
pub use history::{StoredExchange, StoredMessage};
