//! Marketplace HTTP API client library.
//!
//! This crate provides a Rust client for the marketplace backend that sits
//! behind the UserHome view. It supports:
//!
//! - Fetching a user's stored chat history
//! - Sending chat messages to the assistant
//! - Notifying the backend of logout
//! - Fetching purchase history
//!
//! Two endpoint generations exist on the server. [`ApiVersion::V2`]
//! (`/api/...`) is the default; [`ApiVersion::V1`] (`/v1/...`) is kept for
//! older deployments.
//!
//! # Example
//!
//! ```no_run
//! use marketplace_client::{ClientConfig, MarketplaceClient};
//!
//! # async fn example() -> Result<(), marketplace_client::ClientError> {
//! let client = MarketplaceClient::new(ClientConfig::default())?;
//!
//! let reply = client.send_message("u1", "precio?").await?;
//! println!("Assistant: {}", reply);
//!
//! for record in client.fetch_history("u1").await? {
//!     println!("{:?}", record);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::MarketplaceClient;
pub use config::{ApiVersion, ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
