//! Connectivity estimate for the remote chat endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Best-effort reachability estimate for the remote endpoint.
///
/// Advisory and display-only: transitions are driven solely by probe
/// and request outcomes, and nothing makes correctness decisions on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectivityState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The last probe or request succeeded.
    Connected,
    /// The last probe or request failed.
    Disconnected,
}

impl ConnectivityState {
    /// Returns true if the endpoint looked reachable at last contact.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Connected => "online",
            Self::Disconnected => "offline",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(ConnectivityState::default(), ConnectivityState::Unknown);
        assert!(!ConnectivityState::default().is_connected());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(ConnectivityState::Connected.to_string(), "online");
        assert_eq!(ConnectivityState::Disconnected.to_string(), "offline");
    }
}
