//! Mock backend implementations for the UserHome chat client.
//!
//! This crate provides in-memory implementations of the `ChatBackend` trait:
//! - `EchoBackend` - Replies with the message it was sent
//! - `ScriptedBackend` - Serves canned history, replies and failures, and records every call
//! - `FailingBackend` - Fails every request
//! - `DelayedBackend` - Wraps another backend with artificial latency
//!
//! For the real marketplace service, use the `marketplace-client` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_backend::{ChatBackend, EchoBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_backend::BackendError> {
//!     let backend = EchoBackend::with_prefix("eco: ");
//!
//!     let reply = backend.send_message("u1", "hola").await?;
//!     assert_eq!(reply, "eco: hola");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export chat-core types for convenience
pub use chat_core::{async_trait, BackendError, ChatBackend, HistoryRecord, PurchaseRecord};

pub use delayed::DelayedBackend;
pub use echo::EchoBackend;
pub use failing::FailingBackend;
pub use scripted::{BackendCall, ScriptedBackend};
