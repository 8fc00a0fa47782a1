//! Core trait and types for the marketplace UserHome chat client.
//!
//! This crate provides the shared vocabulary used by every other crate in
//! the workspace. It defines:
//!
//! - [`ChatBackend`] - The trait a remote assistant service must implement
//! - [`User`] - The signed-in identity read from the persisted record
//! - [`Message`] / [`Role`] / [`MessageId`] - Transcript entries
//! - [`HistoryRecord`] - Stored conversation items as returned by a backend
//! - [`PurchaseRecord`] - Read-only purchase history rows
//! - [`BackendError`] - Error types for backend operations
//!
//! # Example
//!
//! ```rust
//! use chat_core::{async_trait, BackendError, ChatBackend, HistoryRecord, PurchaseRecord};
//!
//! struct StaticBackend;
//!
//! #[async_trait]
//! impl ChatBackend for StaticBackend {
//!     async fn fetch_history(&self, _user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn send_message(&self, _user_key: &str, content: &str) -> Result<String, BackendError> {
//!         Ok(format!("You said: {}", content))
//!     }
//!
//!     async fn logout(&self, _user_key: &str) -> Result<(), BackendError> {
//!         Ok(())
//!     }
//!
//!     async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "StaticBackend"
//!     }
//! }
//! ```

mod backend;
mod error;
mod history;
mod message;
mod purchase;
mod user;

pub use backend::ChatBackend;
pub use error::BackendError;
pub use history::{HistoryRecord, HistoryTimestamp};
pub use message::{Message, MessageId, MessageIdGenerator, Role, DISPLAY_TIME_FORMAT};
pub use purchase::{Amount, PurchaseRecord};
pub use user::User;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
