//! Loading prior conversation history into transcript messages.

use chat_core::{ChatBackend, HistoryRecord, Message, MessageIdGenerator};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Offset between a stored prompt and its reply.
///
/// Stored exchanges carry a single timestamp; the reply is placed one second
/// after the prompt so it always sorts after it.
fn reply_offset() -> Duration {
    Duration::seconds(1)
}

/// Turn stored records into transcript messages, preserving order.
///
/// Each exchange becomes a user message followed by an assistant message.
/// Records without a timestamp are stamped with `fetched_at`.
pub fn messages_from_records(
    records: Vec<HistoryRecord>,
    ids: &MessageIdGenerator,
    fetched_at: DateTime<Utc>,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(records.len() * 2);

    for record in records {
        match record {
            HistoryRecord::Exchange {
                prompt,
                reply,
                timestamp,
            } => {
                let asked_at = timestamp.unwrap_or(fetched_at);
                messages.push(Message::user(ids.next_id(), prompt, asked_at));
                messages.push(Message::assistant(ids.next_id(), reply, asked_at + reply_offset()));
            }
            HistoryRecord::Message {
                role,
                content,
                timestamp,
            } => {
                messages.push(Message::new(
                    ids.next_id(),
                    role,
                    content,
                    timestamp.unwrap_or(fetched_at),
                ));
            }
        }
    }

    messages
}

/// Fetch a user's history from the backend.
///
/// Never fails: a backend error yields an empty history, so the view still
/// renders for users with nothing stored.
pub async fn fetch_history(
    backend: &dyn ChatBackend,
    user_key: &str,
    ids: &MessageIdGenerator,
) -> Vec<Message> {
    match backend.fetch_history(user_key).await {
        Ok(records) => {
            let messages = messages_from_records(records, ids, Utc::now());
            debug!("Loaded {} history messages from {}", messages.len(), backend.name());
            messages
        }
        Err(e) => {
            warn!(error = %e, "Error loading chat history for {}", user_key);
            Vec::new()
        }
    }
}
