//! Well-known storage keys.

use sana_core::ConversationId;

/// Key holding the active conversation id.
pub const CURRENT_CONVERSATION: &str = "current_conversation";

/// Key holding the saved-conversations summary list.
pub const CONVERSATION_SUMMARIES: &str = "conversation_summaries";

/// Key holding the message list for a conversation.
pub fn conversation_messages(id: &ConversationId) -> String {
    format!("conversation_{id}")
}
