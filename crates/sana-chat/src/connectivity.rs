//! Shared connectivity flag.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use sana_core::ConnectivityState;

const UNKNOWN: u8 = 0;
const CONNECTED: u8 = 1;
const DISCONNECTED: u8 = 2;

/// Cloneable handle to the advisory connectivity estimate.
///
/// Both the session controller and the monitor write to it;
/// last-write-wins is the defined resolution, acceptable because the
/// flag is display-only.
#[derive(Clone, Default)]
pub struct ConnectivityFlag {
    state: Arc<AtomicU8>,
}

impl ConnectivityFlag {
    /// Create a flag starting at [`ConnectivityState::Unknown`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current estimate.
    pub fn get(&self) -> ConnectivityState {
        match self.state.load(Ordering::Relaxed) {
            CONNECTED => ConnectivityState::Connected,
            DISCONNECTED => ConnectivityState::Disconnected,
            _ => ConnectivityState::Unknown,
        }
    }

    /// Record a new estimate.
    pub fn set(&self, state: ConnectivityState) {
        let value = match state {
            ConnectivityState::Unknown => UNKNOWN,
            ConnectivityState::Connected => CONNECTED,
            ConnectivityState::Disconnected => DISCONNECTED,
        };
        self.state.store(value, Ordering::Relaxed);
    }
}
