//! Chat session controller.
//!
//! Owns the active conversation's lifecycle and mediates every
//! user-visible chat operation. Collaborators are injected so the
//! fallback paths are testable: the remote endpoint behind [`ChatApi`],
//! the platform store behind [`KeyValueStore`].
//!
//! Failure policy: every externally triggered failure degrades to a
//! synthesized message or a silent no-op. Nothing here returns an error
//! to the presentation layer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use sana_core::{
    validate_message, ConnectivityState, ConversationId, ConversationSummary, Message,
    MessageId, MessageValidationError,
};
use sana_store::{keys, KeyValueStore};

use crate::api::{BotReply, ChatApi};
use crate::connectivity::ConnectivityFlag;
use crate::error::{ApiError, ChatError};

/// Outcome of a send attempt, for front ends that want to surface
/// validation rejections. Rejections append nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The user message and exactly one bot-sender reply were appended.
    Sent,
    /// The input was rejected before any state change.
    Rejected(MessageValidationError),
}

/// Chat session controller with injected storage and endpoint
/// collaborators.
///
/// `send_message` takes `&mut self`, so sends are serialized by
/// construction; overlapping sends from one session cannot interleave.
pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn KeyValueStore>,
    connectivity: ConnectivityFlag,
    conversation_id: ConversationId,
    messages: Vec<Message>,
    composing: bool,
    initializing: bool,
    mirror_tx: mpsc::UnboundedSender<MirrorJob>,
}

impl ChatSession {
    /// Create an uninitialized session. Call [`ChatSession::initialize`]
    /// before sending. Must be called within a tokio runtime; the
    /// storage mirror runs as a background task.
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<dyn KeyValueStore>) -> Self {
        let mirror_tx = spawn_mirror_writer(store.clone());
        Self {
            api,
            store,
            connectivity: ConnectivityFlag::new(),
            conversation_id: ConversationId::generate(),
            messages: Vec::new(),
            composing: false,
            initializing: true,
            mirror_tx,
        }
    }

    // Read surface -----------------------------------------------------

    /// Messages of the active conversation, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Id of the active conversation.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// True while a bot reply is pending.
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// True until [`ChatSession::initialize`] has completed.
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    /// Current connectivity estimate.
    pub fn connectivity(&self) -> ConnectivityState {
        self.connectivity.get()
    }

    /// Shared connectivity handle, for wiring up a
    /// [`ConnectivityMonitor`](crate::ConnectivityMonitor).
    pub fn connectivity_flag(&self) -> ConnectivityFlag {
        self.connectivity.clone()
    }

    /// Load the saved-conversations list. An unavailable store yields
    /// an empty list.
    pub async fn summaries(&self) -> Vec<ConversationSummary> {
        match load_summaries(self.store.as_ref()).await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, "Failed to load conversation summaries");
                Vec::new()
            }
        }
    }

    // Operations -------------------------------------------------------

    /// Restore the persisted conversation or start a fresh one.
    ///
    /// When storage itself fails, falls back to an in-memory-only
    /// conversation seeded with the welcome message; this path never
    /// raises. Finishes by firing a non-blocking connectivity probe.
    pub async fn initialize(&mut self) {
        self.initializing = true;

        if let Err(e) = self.restore_or_create().await {
            warn!(error = %e, "Storage unavailable, starting emergency in-memory conversation");
            self.conversation_id = ConversationId::generate();
            self.messages = vec![Message::welcome()];
        }

        self.initializing = false;
        info!(
            conversation_id = %self.conversation_id,
            messages = self.messages.len(),
            "Chat session ready"
        );

        // Startup probe; the monitor takes over from here.
        let api = self.api.clone();
        let flag = self.connectivity.clone();
        tokio::spawn(async move {
            let observed = match api.probe().await {
                Ok(()) => ConnectivityState::Connected,
                Err(_) => ConnectivityState::Disconnected,
            };
            flag.set(observed);
        });
    }

    /// Validate and send `raw`.
    ///
    /// On accept, the user message is appended synchronously before any
    /// network activity, and exactly one bot-sender message follows:
    /// the genuine reply on success, a single apology message
    /// (`is_error = true`, wording by failure cause) otherwise. The
    /// composing flag is cleared on every path.
    pub async fn send_message(&mut self, raw: &str) -> SendOutcome {
        let text = match validate_message(raw) {
            Ok(text) => text.to_string(),
            Err(e) => {
                debug!(reason = %e, "Rejected message input");
                return SendOutcome::Rejected(e);
            }
        };

        // Optimistic local append.
        self.messages.push(Message::user(&text));
        self.composing = true;

        let bot_message = match self.api.ask(&text).await {
            Ok(reply) => {
                // A degraded reply still renders as a normal bot
                // message, but flips the connectivity estimate.
                self.connectivity.set(if reply.degraded {
                    ConnectivityState::Disconnected
                } else {
                    ConnectivityState::Connected
                });
                bot_message_from(reply)
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed, substituting apology");
                self.connectivity.set(ConnectivityState::Disconnected);
                Message::error(apology_for(&e))
            }
        };

        self.messages.push(bot_message);
        self.composing = false;

        self.mirror_to_store();
        SendOutcome::Sent
    }

    /// Drop the persisted conversation and start a fresh one with a
    /// distinct id and a single welcome message.
    ///
    /// Storage failures are logged and swallowed; the in-memory reset
    /// happens regardless.
    pub async fn clear_conversation(&mut self) {
        let old_id = std::mem::replace(&mut self.conversation_id, ConversationId::generate());
        self.messages = vec![Message::welcome()];
        self.composing = false;

        if let Err(e) = self
            .store
            .set(keys::CURRENT_CONVERSATION, self.conversation_id.as_str())
            .await
        {
            warn!(error = %e, "Failed to persist new conversation id");
        }
        // The removal and the reseed go through the mirror writer, so
        // a mirror still in flight for the old conversation cannot land
        // after its cleanup.
        let _ = self.mirror_tx.send(MirrorJob::Clear { id: old_id.clone() });
        self.mirror_to_store();

        info!(old = %old_id, new = %self.conversation_id, "Conversation cleared");
    }

    // Internals --------------------------------------------------------

    async fn restore_or_create(&mut self) -> Result<(), ChatError> {
        match self.store.get(keys::CURRENT_CONVERSATION).await? {
            Some(id) => {
                let id = ConversationId::new(id);
                let messages = self.load_messages(&id).await?;
                self.conversation_id = id;
                if messages.is_empty() {
                    self.messages = vec![Message::welcome()];
                    persist_conversation(
                        self.store.as_ref(),
                        &self.conversation_id,
                        &self.messages,
                    )
                    .await?;
                } else {
                    self.messages = messages;
                }
            }
            None => {
                self.conversation_id = ConversationId::generate();
                self.store
                    .set(keys::CURRENT_CONVERSATION, self.conversation_id.as_str())
                    .await?;
                self.messages = vec![Message::welcome()];
                persist_conversation(self.store.as_ref(), &self.conversation_id, &self.messages)
                    .await?;
            }
        }
        Ok(())
    }

    async fn load_messages(&self, id: &ConversationId) -> Result<Vec<Message>, ChatError> {
        let Some(raw) = self.store.get(&keys::conversation_messages(id)).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                warn!(conversation_id = %id, error = %e, "Discarding corrupt message payload");
                Ok(Vec::new())
            }
        }
    }

    /// Mirror the message list and summary entry to storage without
    /// blocking the caller. Write failures are logged and dropped, not
    /// retried.
    fn mirror_to_store(&self) {
        // The writer task holds the receiver until every sender drops,
        // so this send cannot fail while the session is alive.
        let _ = self.mirror_tx.send(MirrorJob::Save {
            id: self.conversation_id.clone(),
            messages: self.messages.clone(),
        });
    }
}

/// Unit of work for the storage mirror task.
enum MirrorJob {
    /// Persist a snapshot of a conversation.
    Save {
        id: ConversationId,
        messages: Vec<Message>,
    },
    /// Drop a conversation's payload and summary entry.
    Clear { id: ConversationId },
}

/// Spawn the single writer task behind the storage mirror.
///
/// All mirror writes for a session funnel through this one task, so
/// snapshots land in submission order and the last write always
/// reflects the newest state. The task exits when the session drops
/// its sender.
fn spawn_mirror_writer(store: Arc<dyn KeyValueStore>) -> mpsc::UnboundedSender<MirrorJob> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match job {
                MirrorJob::Save { id, messages } => {
                    if let Err(e) = persist_conversation(store.as_ref(), &id, &messages).await {
                        warn!(conversation_id = %id, error = %e, "Failed to mirror conversation to storage");
                    }
                }
                MirrorJob::Clear { id } => {
                    if let Err(e) = store.remove(&keys::conversation_messages(&id)).await {
                        warn!(conversation_id = %id, error = %e, "Failed to remove cleared conversation");
                    }
                    if let Err(e) = remove_summary(store.as_ref(), &id).await {
                        warn!(conversation_id = %id, error = %e, "Failed to drop summary entry");
                    }
                }
            }
        }
    });
    tx
}

/// Upsert the summary entry, then write the full message list. The
/// message payload lands last so its presence implies the summary is
/// already current.
async fn persist_conversation(
    store: &dyn KeyValueStore,
    id: &ConversationId,
    messages: &[Message],
) -> Result<(), ChatError> {
    let mut summaries = load_summaries(store).await?;
    let summary = ConversationSummary::from_messages(id, messages);
    match summaries.iter_mut().find(|s| s.id == *id) {
        Some(slot) => *slot = summary,
        None => summaries.push(summary),
    }
    save_summaries(store, &summaries).await?;

    let payload = serde_json::to_string(messages)?;
    store.set(&keys::conversation_messages(id), &payload).await?;
    Ok(())
}

async fn load_summaries(
    store: &dyn KeyValueStore,
) -> Result<Vec<ConversationSummary>, ChatError> {
    let Some(raw) = store.get(keys::CONVERSATION_SUMMARIES).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(summaries) => Ok(summaries),
        Err(e) => {
            warn!(error = %e, "Discarding corrupt summary list");
            Ok(Vec::new())
        }
    }
}

async fn save_summaries(
    store: &dyn KeyValueStore,
    summaries: &[ConversationSummary],
) -> Result<(), ChatError> {
    let payload = serde_json::to_string(summaries)?;
    store.set(keys::CONVERSATION_SUMMARIES, &payload).await?;
    Ok(())
}

async fn remove_summary(store: &dyn KeyValueStore, id: &ConversationId) -> Result<(), ChatError> {
    let mut summaries = load_summaries(store).await?;
    summaries.retain(|s| s.id != *id);
    save_summaries(store, &summaries).await
}

/// Build the displayed bot message from an endpoint reply, preferring
/// server-supplied id and timestamp when present.
fn bot_message_from(reply: BotReply) -> Message {
    let mut message = Message::bot(reply.text);
    if let Some(id) = reply.id {
        message.id = MessageId::new(id);
    }
    if let Some(timestamp) = reply.timestamp {
        message.timestamp = timestamp;
    }
    message
}

/// User-facing substitute wording for a failed exchange.
fn apology_for(error: &ApiError) -> &'static str {
    match error {
        ApiError::Timeout => {
            "We're having a problem taking off 🚀 The server is taking too long to respond. \
             Try again in a moment."
        }
        ApiError::Connect => {
            "We're having a problem taking off 🚀 No internet connection detected. \
             Check your connection and try again."
        }
        _ => {
            "We're having a problem taking off 🚀 I can't connect to the server right now. \
             Check your internet connection and try again."
        }
    }
}
