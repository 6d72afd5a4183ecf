//! Chat client configuration.

use std::time::Duration;

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the remote chat endpoint.
    pub base_url: String,

    /// Deadline for `POST /ask` requests.
    pub ask_timeout: Duration,

    /// Deadline for liveness probes.
    pub probe_timeout: Duration,

    /// Probe cadence while the endpoint looks reachable.
    pub probe_interval_connected: Duration,

    /// Probe cadence while the endpoint looks unreachable.
    pub probe_interval_disconnected: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            ask_timeout: Duration::from_secs(8),
            probe_timeout: Duration::from_secs(5),
            probe_interval_connected: Duration::from_secs(30),
            probe_interval_disconnected: Duration::from_secs(10),
        }
    }
}

impl ChatConfig {
    /// Config pointing at `base_url` with the default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
