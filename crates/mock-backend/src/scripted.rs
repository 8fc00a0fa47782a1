//! Scripted backend implementation - canned responses with call recording.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chat_core::{BackendError, ChatBackend, HistoryRecord, PurchaseRecord};
use tracing::debug;

/// A call received by a [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    FetchHistory { user_key: String },
    SendMessage { user_key: String, content: String },
    Logout { user_key: String },
    FetchPurchases,
}

#[derive(Debug, Default)]
struct Script {
    history: Option<Vec<HistoryRecord>>,
    purchases: Option<Vec<PurchaseRecord>>,
    replies: VecDeque<Option<String>>,
    default_reply: Option<String>,
    logout_fails: bool,
    calls: Vec<BackendCall>,
}

/// A backend driven by a script of canned results.
///
/// Every request is recorded and can be inspected with [`ScriptedBackend::calls`].
/// Clones share the same script and call log, so a test can keep a handle
/// while a session owns another.
///
/// Unscripted requests fail with a transport error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    /// Create a backend with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this history on every fetch.
    pub fn with_history(self, history: Vec<HistoryRecord>) -> Self {
        self.lock().history = Some(history);
        self
    }

    /// Serve these purchases on every fetch.
    pub fn with_purchases(self, purchases: Vec<PurchaseRecord>) -> Self {
        self.lock().purchases = Some(purchases);
        self
    }

    /// Queue a successful reply for the next unanswered send.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.lock().replies.push_back(Some(text.into()));
        self
    }

    /// Queue a failure for the next unanswered send.
    pub fn fail_next_send(self) -> Self {
        self.lock().replies.push_back(None);
        self
    }

    /// Reply with this text once the queue is exhausted.
    pub fn with_default_reply(self, text: impl Into<String>) -> Self {
        self.lock().default_reply = Some(text.into());
        self
    }

    /// Make logout requests fail.
    pub fn fail_logout(self) -> Self {
        self.lock().logout_fails = true;
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Number of send requests received so far.
    pub fn send_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, BackendCall::SendMessage { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread must not hide the calls from the others.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn unscripted(what: &str) -> BackendError {
    BackendError::Transport(format!("no scripted {}", what))
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn fetch_history(&self, user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        let mut script = self.lock();
        script.calls.push(BackendCall::FetchHistory {
            user_key: user_key.to_string(),
        });
        script.history.clone().ok_or_else(|| unscripted("history"))
    }

    async fn send_message(&self, user_key: &str, content: &str) -> Result<String, BackendError> {
        let mut script = self.lock();
        script.calls.push(BackendCall::SendMessage {
            user_key: user_key.to_string(),
            content: content.to_string(),
        });

        let next = match script.replies.pop_front() {
            Some(reply) => reply,
            None => script.default_reply.clone(),
        };
        debug!("Scripted reply for {:?}: {:?}", content, next);
        next.ok_or_else(|| unscripted("reply"))
    }

    async fn logout(&self, user_key: &str) -> Result<(), BackendError> {
        let mut script = self.lock();
        script.calls.push(BackendCall::Logout {
            user_key: user_key.to_string(),
        });
        if script.logout_fails {
            Err(BackendError::Status {
                status: 503,
                body: "logout unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
        let mut script = self.lock();
        script.calls.push(BackendCall::FetchPurchases);
        script.purchases.clone().ok_or_else(|| unscripted("purchases"))
    }

    fn name(&self) -> &str {
        "ScriptedBackend"
    }
}
