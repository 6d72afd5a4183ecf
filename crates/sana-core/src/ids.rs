//! Newtype wrappers for identifiers to ensure type safety.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Timestamp of the most recently minted local identifier.
static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Current time in milliseconds, bumped past the previous value so two
/// ids minted within the same millisecond never collide.
fn next_unique_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID_MILLIS.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

/// Unique identifier for a Conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// Create a ConversationId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh conversation id (`chat_<timestamp-millis>`).
    pub fn generate() -> Self {
        Self(format!("chat_{}", next_unique_millis()))
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Unique identifier for a Message.
///
/// Either minted locally (timestamp-based, strictly increasing within
/// the process) or supplied by the server alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(i64);

impl MessageId {
    /// Create a MessageId from a server-supplied value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Generate a new locally unique MessageId.
    pub fn generate() -> Self {
        Self(next_unique_millis())
    }

    /// Get the inner value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_generate_distinct() {
        let id1 = ConversationId::generate();
        let id2 = ConversationId::generate();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("chat_"));
    }

    #[test]
    fn test_message_id_generate_increasing() {
        let id1 = MessageId::generate();
        let id2 = MessageId::generate();
        assert!(id2.as_i64() > id1.as_i64());
    }

    #[test]
    fn test_id_display() {
        let id = ConversationId::new("chat_123");
        assert_eq!(format!("{}", id), "chat_123");
    }
}
