//! Interactive UserHome view on the terminal.
//!
//! Renders the profile, purchase history and transcript, then reads chat
//! input from stdin one line at a time. Transcript updates are printed by a
//! task subscribed to the session state, so the user's own message shows up
//! before the assistant answers.

use std::io;

use home_session::{ChatSession, EntryRedirect, IdentityStore, IgnoreReason, PurchaseRecord, SendOutcome, ViewState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::render;

/// Input line that logs the user out.
pub const LOGOUT_COMMAND: &str = "/salir";

/// Input line that shows the purchase history again.
pub const PURCHASES_COMMAND: &str = "/compras";

/// Run the view until stdin closes or the user logs out.
pub async fn run_home(session: ChatSession, store: &dyn IdentityStore) -> io::Result<()> {
    println!("{}", render::render_profile(session.user()));

    let (loaded, purchases) = tokio::join!(session.load_history(), session.load_purchases());
    info!(history = loaded, purchases = purchases.len(), "UserHome view ready");

    println!("{}", render::render_purchases(&purchases));

    let snapshot = session.snapshot();
    print!("{}", render::render_chat(&snapshot));
    println!(
        "\nEscribe un mensaje y pulsa Enter. {} muestra tus compras, {} cierra la sesión.",
        PURCHASES_COMMAND, LOGOUT_COMMAND
    );

    let printer = spawn_transcript_printer(session.subscribe(), snapshot.messages.len());
    let redirect = read_input(&session, store, &purchases, BufReader::new(tokio::io::stdin())).await?;
    finish(printer).await;

    if let Some(redirect) = redirect {
        println!("{}", render::render_redirect(&redirect));
    }
    Ok(())
}

/// Handle input lines until the reader closes or the user logs out.
///
/// Each message is sent on its own task so input keeps being read while a
/// reply is pending. Lines arriving during a dispatch are rejected by the
/// session and a notice is printed. The view is unmounted on return.
async fn read_input<R>(
    session: &ChatSession,
    store: &dyn IdentityStore,
    purchases: &[PurchaseRecord],
    reader: R,
) -> io::Result<Option<EntryRedirect>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut dispatches = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        while dispatches.try_join_next().is_some() {}

        match line.trim() {
            LOGOUT_COMMAND => {
                let redirect = session.logout(store).await;
                dispatches.shutdown().await;
                return Ok(Some(redirect));
            }
            PURCHASES_COMMAND => {
                println!("{}", render::render_purchases(purchases));
            }
            _ => {
                let sender = session.clone();
                dispatches.spawn(async move {
                    match sender.send(&line).await {
                        SendOutcome::Ignored(IgnoreReason::Busy) => println!("{}", render::BUSY_NOTICE),
                        SendOutcome::Ignored(IgnoreReason::Empty) => {}
                        outcome => debug!(?outcome, "Message handled"),
                    }
                });
            }
        }
    }

    debug!("Input closed, waiting for pending replies");
    while let Some(joined) = dispatches.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Message dispatch task failed");
        }
    }
    session.unmount();
    Ok(None)
}

/// Print transcript lines as they are appended, plus the typing indicator
/// whenever a dispatch starts. Stops once the view is unmounted.
fn spawn_transcript_printer(mut updates: watch::Receiver<ViewState>, already_printed: usize) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut printed = already_printed;
        let mut was_busy = false;

        while updates.changed().await.is_ok() {
            let (lines, busy, mounted) = {
                let state = updates.borrow_and_update();
                let lines: Vec<String> = state
                    .messages
                    .iter()
                    .skip(printed)
                    .map(render::format_message)
                    .collect();
                (lines, state.is_busy(), state.mounted)
            };

            printed += lines.len();
            for line in lines {
                println!("{}", line);
            }
            if busy && !was_busy {
                println!("{}", render::TYPING_INDICATOR);
            }
            was_busy = busy;

            if !mounted {
                break;
            }
        }
    })
}

async fn finish(printer: JoinHandle<()>) {
    if let Err(e) = printer.await {
        warn!(error = %e, "Transcript printer stopped unexpectedly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chat_core::User;
    use home_session::{MemoryIdentityStore, RedirectReason};
    use mock_backend::{BackendCall, DelayedBackend, ScriptedBackend};

    fn ana_store() -> MemoryIdentityStore {
        MemoryIdentityStore::with_user(&User::new("u1", "Ana", "ana@x.com")).unwrap()
    }

    #[tokio::test]
    async fn test_lines_typed_during_dispatch_are_not_sent() {
        let scripted = ScriptedBackend::new().with_default_reply("ok");
        let store = ana_store();
        let session =
            ChatSession::activate(&store, Arc::new(DelayedBackend::with_millis(scripted.clone(), 100))).unwrap();

        let redirect = read_input(&session, &store, &[], &b"uno\ndos\ntres\n"[..]).await.unwrap();

        assert!(redirect.is_none());
        assert_eq!(scripted.send_count(), 1);
        let contents: Vec<_> = session.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["uno", "ok"]);
        assert!(!session.is_mounted());
    }

    #[tokio::test]
    async fn test_blank_and_purchase_lines_are_not_sent() {
        let scripted = ScriptedBackend::new().with_default_reply("ok");
        let store = ana_store();
        let session = ChatSession::activate(&store, Arc::new(scripted.clone())).unwrap();

        read_input(&session, &store, &[], &b"   \n/compras\n"[..]).await.unwrap();

        assert_eq!(scripted.send_count(), 0);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_logout_command() {
        let scripted = ScriptedBackend::new();
        let store = ana_store();
        let session = ChatSession::activate(&store, Arc::new(scripted.clone())).unwrap();

        let redirect = read_input(&session, &store, &[], &b"/salir\nhola\n"[..]).await.unwrap();

        assert_eq!(redirect.map(|r| r.reason), Some(RedirectReason::LoggedOut));
        assert!(store.is_empty());
        assert_eq!(
            scripted.calls(),
            vec![BackendCall::Logout {
                user_key: "u1".to_string()
            }]
        );
    }
}
