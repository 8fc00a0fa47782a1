//! Error types for session operations.

use thiserror::Error;

/// Errors from the persisted identity store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the identity record failed.
    #[error("identity store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The identity record could not be encoded.
    #[error("identity record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the view sends the user back to the entry view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectReason {
    /// No identity record is stored.
    #[error("no signed-in user")]
    NoIdentity,

    /// The stored record is not a valid user.
    #[error("stored user record is malformed: {0}")]
    MalformedIdentity(String),

    /// The stored user has neither an id nor an email.
    #[error("stored user has no id or email")]
    MissingUserKey,

    /// The identity store could not be read.
    #[error("identity store unavailable: {0}")]
    StoreUnavailable(String),

    /// The user logged out.
    #[error("user logged out")]
    LoggedOut,
}

/// Navigation back to the entry (login) view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirecting to entry view: {reason}")]
pub struct EntryRedirect {
    pub reason: RedirectReason,
}

impl From<RedirectReason> for EntryRedirect {
    fn from(reason: RedirectReason) -> Self {
        Self { reason }
    }
}
