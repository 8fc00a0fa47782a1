//! Stored conversation records.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Role;

/// One stored item of a user's conversation, as returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRecord {
    /// A prompt together with the assistant's reply.
    Exchange {
        prompt: String,
        reply: String,
        timestamp: Option<DateTime<Utc>>,
    },
    /// A single already-split message.
    Message {
        role: Role,
        content: String,
        timestamp: Option<DateTime<Utc>>,
    },
}

impl HistoryRecord {
    /// Create an exchange record without a timestamp.
    pub fn exchange(prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        Self::Exchange {
            prompt: prompt.into(),
            reply: reply.into(),
            timestamp: None,
        }
    }

    /// Create a single-message record.
    pub fn message(role: Role, content: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self::Message {
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// A timestamp as it appears on the wire: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryTimestamp {
    Millis(i64),
    Text(String),
}

impl HistoryTimestamp {
    /// Interpret the value as a UTC instant.
    ///
    /// Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
    /// strings (read as UTC), and numeric strings holding epoch milliseconds.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Self::Text(raw) => {
                let raw = raw.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    return Some(dt.with_timezone(&Utc));
                }
                for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
                    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                        return Some(naive.and_utc());
                    }
                }
                raw.parse::<i64>()
                    .ok()
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_millis() {
        let ts = HistoryTimestamp::Millis(1_700_000_000_000);
        assert_eq!(ts.to_datetime().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ts = HistoryTimestamp::Text("2025-03-01T12:00:00.000Z".to_string());
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_timestamp_naive_and_numeric_text() {
        let ts = HistoryTimestamp::Text("2025-03-01 12:00:00".to_string());
        assert!(ts.to_datetime().is_some());

        let ts = HistoryTimestamp::Text("1700000000000".to_string());
        assert_eq!(ts.to_datetime().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_timestamp_garbage() {
        let ts = HistoryTimestamp::Text("ayer".to_string());
        assert!(ts.to_datetime().is_none());
    }

    #[test]
    fn test_deserialize_either_shape() {
        let ts: HistoryTimestamp = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(ts, HistoryTimestamp::Millis(1_700_000_000_000));

        let ts: HistoryTimestamp = serde_json::from_str("\"2025-03-01T12:00:00Z\"").unwrap();
        assert!(matches!(ts, HistoryTimestamp::Text(_)));
    }
}
