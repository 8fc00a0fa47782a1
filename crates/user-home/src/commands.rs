//! Account commands that stand in for the marketplace entry view.

use std::sync::Arc;

use chat_core::{ChatBackend, User};
use home_session::{ChatSession, IdentityStore, SessionError};
use tracing::info;

use crate::render;

/// Store `user` as the signed-in user.
pub fn login(store: &dyn IdentityStore, user: User) -> Result<(), SessionError> {
    store.save(&user)?;
    info!("Stored identity for {}", user.nombre);
    println!("Sesión iniciada como {} <{}>.", user.nombre, user.correo);
    Ok(())
}

/// Log out the stored user, if any.
///
/// With a usable identity the backend is notified first. Otherwise the
/// record, if present, is simply removed.
pub async fn logout(store: &dyn IdentityStore, backend: Arc<dyn ChatBackend>) -> Result<(), SessionError> {
    match ChatSession::activate(store, backend) {
        Ok(session) => {
            let redirect = session.logout(store).await;
            println!("{}", render::render_redirect(&redirect));
        }
        Err(redirect) => {
            info!(reason = %redirect.reason, "No usable identity, clearing record");
            store.clear()?;
            println!("No había una sesión activa.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use home_session::MemoryIdentityStore;
    use mock_backend::{BackendCall, ScriptedBackend};

    #[test]
    fn test_login_stores_user() {
        let store = MemoryIdentityStore::new();
        login(&store, User::new("u1", "Ana", "ana@x.com")).unwrap();

        let raw = store.load().unwrap().unwrap();
        let user: User = serde_json::from_str(&raw).unwrap();
        assert_eq!(user.user_key(), Some("u1"));
    }

    #[tokio::test]
    async fn test_logout_notifies_backend() {
        let store = MemoryIdentityStore::with_user(&User::new("u1", "Ana", "ana@x.com")).unwrap();
        let backend = ScriptedBackend::new();

        logout(&store, Arc::new(backend.clone())).await.unwrap();

        assert!(store.is_empty());
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Logout {
                user_key: "u1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_logout_clears_malformed_record() {
        let store = MemoryIdentityStore::with_raw("{roto");
        let backend = ScriptedBackend::new();

        logout(&store, Arc::new(backend.clone())).await.unwrap();

        assert!(store.is_empty());
        assert!(backend.calls().is_empty());
    }
}
