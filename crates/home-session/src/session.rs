//! The UserHome chat session.
//!
//! A [`ChatSession`] owns the view state of one signed-in user: the
//! transcript, the input draft, the dispatch phase and whether the view is
//! still mounted. State lives in a `watch` channel so renderers can observe
//! the optimistic user message before the backend answers. All mutations
//! are synchronous, so no lock is ever held across an `.await`.

use std::fmt;
use std::sync::Arc;

use chat_core::{ChatBackend, Message, MessageIdGenerator, PurchaseRecord, User};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{EntryRedirect, RedirectReason};
use crate::history::fetch_history;
use crate::identity::IdentityStore;
use crate::loader::{load_session_context, SessionContext};
use crate::purchases::load_purchases;

/// Assistant text appended when the backend fails to answer.
pub const FALLBACK_REPLY: &str = "Lo siento, hubo un error al procesar tu mensaje.";

/// Where the single in-flight dispatch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPhase {
    /// Nothing in flight; sends are accepted.
    #[default]
    Idle,
    /// Waiting for the backend reply.
    Sending,
    /// Reply received and appended.
    Succeeded,
    /// Backend failed; fallback appended.
    Failed,
}

/// Snapshot of everything the view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Transcript, oldest first. Only ever appended to.
    pub messages: Vec<Message>,
    /// Current input draft.
    pub input: String,
    pub phase: DispatchPhase,
    /// Cleared when the view is torn down.
    pub mounted: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            phase: DispatchPhase::Idle,
            mounted: true,
        }
    }
}

impl ViewState {
    /// A dispatch is in flight; the typing indicator is shown.
    pub fn is_busy(&self) -> bool {
        self.phase != DispatchPhase::Idle
    }
}

/// Why a send was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The content was empty after trimming.
    Empty,
    /// Another dispatch is still in flight.
    Busy,
    /// The view has been torn down.
    Unmounted,
}

/// Result of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply was appended.
    Delivered,
    /// The backend failed and the fallback reply was appended.
    Failed,
    /// The view was unmounted before the backend answered; nothing appended.
    Discarded,
    /// Nothing was dispatched and the state is unchanged.
    Ignored(IgnoreReason),
}

/// Chat session for one signed-in user.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

struct Inner {
    context: SessionContext,
    backend: Arc<dyn ChatBackend>,
    ids: MessageIdGenerator,
    state: watch::Sender<ViewState>,
}

/// Returns the phase to `Idle` when a dispatch ends, however it ends.
struct DispatchGuard<'a> {
    state: &'a watch::Sender<ViewState>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if state.phase == DispatchPhase::Idle {
                return false;
            }
            state.phase = DispatchPhase::Idle;
            true
        });
    }
}

impl ChatSession {
    /// Activate the view: load the signed-in user from `store`.
    ///
    /// Fails closed with an [`EntryRedirect`] when no usable identity is
    /// stored. History is not loaded yet; call [`ChatSession::load_history`].
    pub fn activate(store: &dyn IdentityStore, backend: Arc<dyn ChatBackend>) -> Result<Self, EntryRedirect> {
        let context = load_session_context(store)?;
        Ok(Self::new(context, backend))
    }

    /// Create a mounted session with an empty transcript.
    pub fn new(context: SessionContext, backend: Arc<dyn ChatBackend>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        info!(backend = backend.name(), "Chat session started for {}", context.user_key);
        Self {
            inner: Arc::new(Inner {
                context,
                backend,
                ids: MessageIdGenerator::new(),
                state,
            }),
        }
    }

    /// Fetch stored history and append it to the transcript.
    ///
    /// Returns the number of messages appended. A failed fetch appends
    /// nothing, as does a fetch finishing after unmount.
    pub async fn load_history(&self) -> usize {
        let inner = &self.inner;
        let history = fetch_history(inner.backend.as_ref(), &inner.context.user_key, &inner.ids).await;
        let count = history.len();

        let appended = inner.state.send_if_modified(|state| {
            if !state.mounted || history.is_empty() {
                return false;
            }
            state.messages.extend(history);
            true
        });

        if appended {
            count
        } else {
            0
        }
    }

    /// Fetch the purchase history; failures yield an empty list.
    pub async fn load_purchases(&self) -> Vec<PurchaseRecord> {
        load_purchases(self.inner.backend.as_ref()).await
    }

    /// Subscribe to view state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Current view state.
    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Current transcript.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.borrow().messages.clone()
    }

    pub fn phase(&self) -> DispatchPhase {
        self.inner.state.borrow().phase
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().is_busy()
    }

    /// Replace the input draft.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|state| state.input = text);
    }

    /// Current input draft.
    pub fn input(&self) -> String {
        self.inner.state.borrow().input.clone()
    }

    /// Send the current input draft.
    pub async fn submit(&self) -> SendOutcome {
        let draft = self.input();
        self.send(&draft).await
    }

    /// Send a message to the assistant.
    ///
    /// The user message is appended and the draft cleared before the
    /// backend is called. At most one send is in flight per session; empty
    /// content and sends while busy are ignored without touching state.
    pub async fn send(&self, content: &str) -> SendOutcome {
        let text = content.trim();
        if text.is_empty() {
            debug!("Ignoring empty message");
            return SendOutcome::Ignored(IgnoreReason::Empty);
        }

        let inner = &self.inner;
        let mut rejected = None;
        inner.state.send_if_modified(|state| {
            if !state.mounted {
                rejected = Some(IgnoreReason::Unmounted);
                return false;
            }
            if state.is_busy() {
                rejected = Some(IgnoreReason::Busy);
                return false;
            }
            state
                .messages
                .push(Message::user(inner.ids.next_id(), text, Utc::now()));
            state.input.clear();
            state.phase = DispatchPhase::Sending;
            true
        });

        if let Some(reason) = rejected {
            debug!(?reason, "Send ignored");
            return SendOutcome::Ignored(reason);
        }

        let _guard = DispatchGuard { state: &inner.state };

        debug!("Dispatching message for {}", inner.context.user_key);
        let (phase, reply) = match inner.backend.send_message(&inner.context.user_key, text).await {
            Ok(reply) => (DispatchPhase::Succeeded, reply),
            Err(e) => {
                warn!(error = %e, "Error sending message");
                (DispatchPhase::Failed, FALLBACK_REPLY.to_string())
            }
        };

        let appended = inner.state.send_if_modified(|state| {
            if !state.mounted {
                return false;
            }
            state
                .messages
                .push(Message::assistant(inner.ids.next_id(), reply, Utc::now()));
            state.phase = phase;
            true
        });

        if !appended {
            debug!("View unmounted before reply arrived, discarding");
            return SendOutcome::Discarded;
        }

        match phase {
            DispatchPhase::Failed => SendOutcome::Failed,
            _ => SendOutcome::Delivered,
        }
    }

    /// Tear down the view. Replies arriving afterwards are discarded.
    pub fn unmount(&self) {
        self.inner.state.send_if_modified(|state| {
            let was_mounted = state.mounted;
            state.mounted = false;
            was_mounted
        });
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.borrow().mounted
    }

    /// Log out: notify the backend, clear the stored identity and unmount.
    ///
    /// The backend call is best effort. The identity is cleared and the
    /// redirect returned whether or not it succeeds.
    pub async fn logout(&self, store: &dyn IdentityStore) -> EntryRedirect {
        let user_key = &self.inner.context.user_key;

        if let Err(e) = self.inner.backend.logout(user_key).await {
            warn!(error = %e, "Error notifying logout for {}", user_key);
        }

        if let Err(e) = store.clear() {
            warn!(error = %e, "Failed to clear stored identity");
        }

        self.unmount();
        info!("User {} logged out", user_key);
        RedirectReason::LoggedOut.into()
    }

    pub fn context(&self) -> &SessionContext {
        &self.inner.context
    }

    pub fn user(&self) -> &User {
        &self.inner.context.user
    }

    /// Key addressing this user on the backend.
    pub fn user_key(&self) -> &str {
        &self.inner.context.user_key
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("user_key", &self.inner.context.user_key)
            .field("backend", &self.inner.backend.name())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}
