//! Sana chat client
//!
//! Connectivity-aware messaging client for the Sana wellness app: the
//! chat session controller, the HTTP endpoint client, and the
//! background connectivity monitor.
//!
//! The session controller is the absorption boundary for failures:
//! network and storage problems degrade to a synthesized bot message or
//! a silent no-op, never to an error surfaced to the presentation
//! layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sana_chat::{ChatConfig, ChatSession, ConnectivityMonitor, HttpChatApi};
//! use sana_store::MemoryStore;
//!
//! async fn run() {
//!     let config = ChatConfig::new("http://localhost:8000");
//!     let api = Arc::new(HttpChatApi::new(config.clone()));
//!     let store = Arc::new(MemoryStore::new());
//!
//!     let mut session = ChatSession::new(api.clone(), store);
//!     session.initialize().await;
//!
//!     let monitor = ConnectivityMonitor::new(api, session.connectivity_flag(), &config);
//!     let _handle = monitor.spawn();
//!
//!     session.send_message("Hello").await;
//!     for message in session.messages() {
//!         println!("{:?}: {}", message.sender, message.text);
//!     }
//! }
//! ```

pub mod api;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod monitor;
pub mod session;

// Re-export main types
pub use api::{BotReply, ChatApi, HttpChatApi};
pub use config::ChatConfig;
pub use connectivity::ConnectivityFlag;
pub use error::{ApiError, ChatError};
pub use monitor::ConnectivityMonitor;
pub use session::{ChatSession, SendOutcome};
