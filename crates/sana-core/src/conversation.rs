//! Conversation summary entries for conversation-listing UIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ConversationId;
use crate::message::{lenient_timestamp, Message, Sender};

/// Title length cap in the saved-conversations list.
const TITLE_MAX_CHARS: usize = 40;

/// Preview length cap in the saved-conversations list.
const PREVIEW_MAX_CHARS: usize = 80;

/// Entry in the saved-conversations list: enough to render a row
/// without loading the full message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// The conversation this entry describes.
    pub id: ConversationId,
    /// First user message, truncated; placeholder when none exists yet.
    pub title: String,
    /// Last message body, truncated.
    pub preview: String,
    /// Instant of the last message.
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Total messages in the conversation.
    pub message_count: usize,
}

impl ConversationSummary {
    /// Build a summary from a conversation's current message list.
    pub fn from_messages(id: &ConversationId, messages: &[Message]) -> Self {
        let title = messages
            .iter()
            .find(|m| m.sender == Sender::User)
            .map(|m| truncate_chars(&m.text, TITLE_MAX_CHARS))
            .unwrap_or_else(|| "New conversation".to_string());

        let (preview, timestamp) = match messages.last() {
            Some(last) => (truncate_chars(&last.text, PREVIEW_MAX_CHARS), last.timestamp),
            None => (String::new(), Utc::now()),
        };

        Self {
            id: id.clone(),
            title,
            preview,
            timestamp,
            message_count: messages.len(),
        }
    }
}

/// Truncate on a character boundary, appending an ellipsis when cut.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_messages() {
        let id = ConversationId::new("chat_1");
        let messages = vec![
            Message::welcome(),
            Message::user("I feel stressed about exams"),
            Message::bot("That sounds tough. Want to talk about it?"),
        ];

        let summary = ConversationSummary::from_messages(&id, &messages);
        assert_eq!(summary.id, id);
        assert_eq!(summary.title, "I feel stressed about exams");
        assert_eq!(summary.preview, "That sounds tough. Want to talk about it?");
        assert_eq!(summary.message_count, 3);
    }

    #[test]
    fn test_summary_without_user_message() {
        let id = ConversationId::new("chat_2");
        let messages = vec![Message::welcome()];

        let summary = ConversationSummary::from_messages(&id, &messages);
        assert_eq!(summary.title, "New conversation");
        assert_eq!(summary.message_count, 1);
    }

    #[test]
    fn test_title_truncation() {
        let id = ConversationId::new("chat_3");
        let long = "a".repeat(100);
        let messages = vec![Message::user(long)];

        let summary = ConversationSummary::from_messages(&id, &messages);
        assert_eq!(summary.title.chars().count(), TITLE_MAX_CHARS + 1);
        assert!(summary.title.ends_with('…'));
    }
}
