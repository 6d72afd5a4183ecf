//! Chat message types and input validation.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::ids::MessageId;

/// Maximum accepted message length in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Greeting seeded at the start of every conversation.
pub const WELCOME_TEXT: &str = "Hi! I'm your wellness assistant. How can I help you today?";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Reply from the assistant (genuine or synthesized).
    Bot,
}

/// A message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Locally minted or server-supplied identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Who authored the message.
    pub sender: Sender,
    /// Creation instant. Missing or invalid persisted values fall back
    /// to now so the message is always renderable.
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Marks a synthesized failure notice rather than a genuine reply.
    #[serde(default)]
    pub is_error: bool,
    /// Opaque reference to locally picked image content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl Message {
    /// Create a new message with a fresh id and the current time.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            is_error: false,
            image_uri: None,
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// Create a synthesized bot-authored failure notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Sender::Bot, text)
        }
    }

    /// Create the conversation-opening welcome message.
    pub fn welcome() -> Self {
        Self::bot(WELCOME_TEXT)
    }

    /// Attach an image reference.
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }
}

/// Accept RFC 3339 strings, unix milliseconds, or garbage; anything
/// unparseable becomes the current instant.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Rfc3339(String),
        Millis(i64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer) {
        Ok(Some(Raw::Rfc3339(s))) => s.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now()),
        Ok(Some(Raw::Millis(ms))) => Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now),
        _ => Utc::now(),
    })
}

/// Rejection reasons for a candidate message body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageValidationError {
    /// The trimmed text is empty.
    #[error("Message cannot be empty")]
    Empty,
    /// The trimmed text exceeds the length limit.
    #[error("Message is too long ({len} characters, maximum {max})")]
    TooLong { len: usize, max: usize },
}

/// Validate a candidate message body, returning the trimmed text.
///
/// Pure and local: touches neither network nor storage.
pub fn validate_message(raw: &str) -> Result<&str, MessageValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MessageValidationError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_MESSAGE_LEN {
        return Err(MessageValidationError::TooLong {
            len,
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(trimmed)
}
