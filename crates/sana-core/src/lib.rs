//! Sana Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage
//! - Runtime specifics
//!
//! All types here represent the chat domain of the Sana wellness app:
//! messages, conversations, identifiers, and the connectivity estimate
//! shared by the client crates.

pub mod connectivity;
pub mod conversation;
pub mod ids;
pub mod message;

// Re-export commonly used types
pub use connectivity::ConnectivityState;
pub use conversation::ConversationSummary;
pub use ids::{ConversationId, MessageId};
pub use message::{
    validate_message, Message, MessageValidationError, Sender, MAX_MESSAGE_LEN, WELCOME_TEXT,
};
