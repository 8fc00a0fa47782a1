//! Session loading from the persisted identity record.

use chat_core::User;
use tracing::{info, warn};

use crate::error::{EntryRedirect, RedirectReason};
use crate::identity::IdentityStore;

/// The signed-in user together with the key used to address them on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: User,
    pub user_key: String,
}

impl SessionContext {
    /// Build a context for a user, failing when the user has no key.
    pub fn for_user(user: User) -> Result<Self, EntryRedirect> {
        let user_key = user
            .user_key()
            .ok_or(RedirectReason::MissingUserKey)?
            .to_string();
        Ok(Self { user, user_key })
    }
}

/// Read the current user from the store.
///
/// Fails closed: a missing, unreadable or malformed record, or one without
/// an id or email, all redirect to the entry view.
pub fn load_session_context(store: &dyn IdentityStore) -> Result<SessionContext, EntryRedirect> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No stored user, redirecting to entry view");
            return Err(RedirectReason::NoIdentity.into());
        }
        Err(e) => {
            warn!(error = %e, "Could not read identity store");
            return Err(RedirectReason::StoreUnavailable(e.to_string()).into());
        }
    };

    let user: User = serde_json::from_str(&raw).map_err(|e| {
        warn!(error = %e, "Stored user record is malformed");
        RedirectReason::MalformedIdentity(e.to_string())
    })?;

    let context = SessionContext::for_user(user).inspect_err(|_| {
        warn!("Stored user has neither id nor email");
    })?;

    info!(user_key = %context.user_key, "Session loaded for {}", context.user.nombre);
    Ok(context)
}
