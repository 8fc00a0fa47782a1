//! Session state for the marketplace UserHome view.
//!
//! This crate holds everything the view does apart from drawing it:
//! - loading the signed-in user from the persisted identity record
//! - fetching prior conversation history and purchase records
//! - optimistic, single-flight message dispatch with a fallback reply
//! - logout, which always clears the local identity
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use home_session::{ChatSession, FileIdentityStore};
//!
//! let store = FileIdentityStore::in_dir(".marketplace");
//! let session = ChatSession::activate(&store, Arc::new(backend))?;
//! session.load_history().await;
//!
//! let outcome = session.send("precio?").await;
//! ```

pub mod error;
pub mod history;
pub mod identity;
pub mod loader;
pub mod purchases;
pub mod session;

pub use error::{EntryRedirect, RedirectReason, SessionError};
pub use history::{fetch_history, messages_from_records};
pub use identity::{FileIdentityStore, IdentityStore, MemoryIdentityStore, STORAGE_KEY};
pub use loader::{load_session_context, SessionContext};
pub use purchases::load_purchases;
pub use session::{ChatSession, DispatchPhase, IgnoreReason, SendOutcome, ViewState, FALLBACK_REPLY};

// Re-export the shared types the session exposes
pub use chat_core::{ChatBackend, Message, MessageId, PurchaseRecord, Role, User};
