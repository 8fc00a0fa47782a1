//! Transcript message types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Format used for the precomputed display time of a message.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M:%S";

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a transcript message, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Wrap a raw id value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates message ids derived from the wall clock in milliseconds.
///
/// Ids are strictly increasing: when two ids are requested within the same
/// millisecond (or the clock steps backwards) the generator hands out
/// `last + 1` instead of repeating a value.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    /// Create a generator with no ids handed out yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for the current wall-clock time.
    pub fn next_id(&self) -> MessageId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now)
    }

    /// Next id for a given millisecond timestamp.
    pub fn next_at(&self, millis: u64) -> MessageId {
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = millis.max(current.saturating_add(1));
            match self
                .last
                .compare_exchange(current, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return MessageId(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}

/// A single entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id within the session.
    pub id: MessageId,
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// `created_at` rendered in local time, computed once at creation.
    pub display_time: String,
}

impl Message {
    /// Create a message, precomputing its display time.
    pub fn new(id: MessageId, role: Role, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let display_time = created_at
            .with_timezone(&Local)
            .format(DISPLAY_TIME_FORMAT)
            .to_string();
        Self {
            id,
            role,
            content: content.into(),
            created_at,
            display_time,
        }
    }

    /// Create a user message.
    pub fn user(id: MessageId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, Role::User, content, created_at)
    }

    /// Create an assistant message.
    pub fn assistant(id: MessageId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, Role::Assistant, content, created_at)
    }

    /// Whether this message was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_follow_clock() {
        let ids = MessageIdGenerator::new();
        assert_eq!(ids.next_at(1_000).get(), 1_000);
        assert_eq!(ids.next_at(2_500).get(), 2_500);
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let ids = MessageIdGenerator::new();
        let first = ids.next_at(1_700_000_000_000);
        let second = ids.next_at(1_700_000_000_000);
        let third = ids.next_at(1_700_000_000_000);

        assert_eq!(second.get(), first.get() + 1);
        assert_eq!(third.get(), first.get() + 2);
    }

    #[test]
    fn test_ids_survive_clock_going_backwards() {
        let ids = MessageIdGenerator::new();
        let first = ids.next_at(5_000);
        let second = ids.next_at(4_000);
        assert!(second > first);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let ids = Arc::new(MessageIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next_at(42)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_message_display_time() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T12:34:56Z")
            .unwrap()
            .with_timezone(&Utc);
        let msg = Message::user(MessageId::new(1), "hola", at);

        assert!(msg.is_user());
        assert_eq!(msg.display_time.len(), 8);
        assert_eq!(
            msg.display_time,
            at.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string()
        );
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
