//! Background liveness monitoring with an adaptive probe interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use sana_core::ConnectivityState;

use crate::api::ChatApi;
use crate::config::ChatConfig;
use crate::connectivity::ConnectivityFlag;

/// Polls the remote endpoint and maintains the shared connectivity
/// flag.
///
/// The probe cadence adapts to the observed state: short while
/// disconnected so recovery is noticed quickly, long while connected to
/// keep overhead down. Start it only after the session controller has
/// finished initializing; from then on it is the single long-lived
/// prober.
pub struct ConnectivityMonitor {
    api: Arc<dyn ChatApi>,
    flag: ConnectivityFlag,
    interval_connected: Duration,
    interval_disconnected: Duration,
}

impl ConnectivityMonitor {
    /// Create a monitor sharing `flag` with a session controller.
    pub fn new(api: Arc<dyn ChatApi>, flag: ConnectivityFlag, config: &ChatConfig) -> Self {
        Self {
            api,
            flag,
            interval_connected: config.probe_interval_connected,
            interval_disconnected: config.probe_interval_disconnected,
        }
    }

    /// Probe interval for a given state. Unknown probes on the short
    /// interval until the first probe settles the state.
    pub fn interval_for(&self, state: ConnectivityState) -> Duration {
        match state {
            ConnectivityState::Connected => self.interval_connected,
            ConnectivityState::Unknown | ConnectivityState::Disconnected => {
                self.interval_disconnected
            }
        }
    }

    /// Run one probe, update the flag, and return the delay before the
    /// next probe. The flag is only written when the state changed.
    pub async fn tick(&self) -> Duration {
        let observed = match self.api.probe().await {
            Ok(()) => ConnectivityState::Connected,
            Err(e) => {
                debug!(error = %e, "Liveness probe failed");
                ConnectivityState::Disconnected
            }
        };

        let previous = self.flag.get();
        if observed != previous {
            info!(previous = %previous, observed = %observed, "Connectivity changed");
            self.flag.set(observed);
        }

        self.interval_for(observed)
    }

    /// Spawn the monitor as a background repeating task. A probe in
    /// flight never blocks message sending; they only share the flag.
    ///
    /// The session controller probes once during startup, so the first
    /// monitor probe waits a full interval instead of firing
    /// immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut delay = self.interval_for(self.flag.get());
            loop {
                tokio::time::sleep(delay).await;
                delay = self.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::api::BotReply;
    use crate::error::ApiError;

    /// Probe results are popped in order; once exhausted, probes fail.
    struct ScriptedProbes {
        outcomes: Mutex<VecDeque<bool>>,
    }

    impl ScriptedProbes {
        fn new(outcomes: impl IntoIterator<Item = bool>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl ChatApi for ScriptedProbes {
        async fn ask(&self, _question: &str) -> Result<BotReply, ApiError> {
            Err(ApiError::Connect)
        }

        async fn probe(&self) -> Result<(), ApiError> {
            match self.outcomes.lock().await.pop_front() {
                Some(true) => Ok(()),
                _ => Err(ApiError::Connect),
            }
        }
    }

    fn test_config() -> ChatConfig {
        ChatConfig {
            probe_interval_connected: Duration::from_secs(30),
            probe_interval_disconnected: Duration::from_secs(10),
            ..ChatConfig::default()
        }
    }

    #[tokio::test]
    async fn test_interval_adapts_to_probe_outcomes() {
        let api = ScriptedProbes::new([false, false, true, true, false]);
        let flag = ConnectivityFlag::new();
        let config = test_config();
        let monitor = ConnectivityMonitor::new(api, flag.clone(), &config);

        // Consecutive failures keep the short interval armed.
        assert_eq!(monitor.tick().await, Duration::from_secs(10));
        assert_eq!(flag.get(), ConnectivityState::Disconnected);
        assert_eq!(monitor.tick().await, Duration::from_secs(10));

        // Recovery switches to the long interval.
        assert_eq!(monitor.tick().await, Duration::from_secs(30));
        assert_eq!(flag.get(), ConnectivityState::Connected);
        assert_eq!(monitor.tick().await, Duration::from_secs(30));

        // A failure drops back to the short interval.
        assert_eq!(monitor.tick().await, Duration::from_secs(10));
        assert_eq!(flag.get(), ConnectivityState::Disconnected);
    }

    #[tokio::test]
    async fn test_unknown_state_probes_on_short_interval() {
        let api = ScriptedProbes::new([]);
        let config = test_config();
        let monitor = ConnectivityMonitor::new(api, ConnectivityFlag::new(), &config);

        assert_eq!(
            monitor.interval_for(ConnectivityState::Unknown),
            Duration::from_secs(10)
        );
    }

    /// Counts probes; every probe succeeds.
    struct CountingProbes {
        probes: std::sync::atomic::AtomicU32,
    }

    impl CountingProbes {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                probes: std::sync::atomic::AtomicU32::new(0),
            })
        }

        fn count(&self) -> u32 {
            self.probes.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatApi for CountingProbes {
        async fn ask(&self, _question: &str) -> Result<BotReply, ApiError> {
            Err(ApiError::Connect)
        }

        async fn probe(&self) -> Result<(), ApiError> {
            self.probes
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_waits_one_interval_before_first_probe() {
        let api = CountingProbes::new();
        let flag = ConnectivityFlag::new();
        flag.set(ConnectivityState::Connected);
        let config = test_config();

        let monitor = ConnectivityMonitor::new(api.clone(), flag, &config);
        let handle = monitor.spawn();

        // Just short of the connected interval, nothing has probed.
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(api.count(), 0);

        // Past the interval boundary, exactly one probe ran.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.count(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_steady_state_keeps_flag_and_interval() {
        let api = ScriptedProbes::new([true, true]);
        let flag = ConnectivityFlag::new();
        let config = test_config();
        let monitor = ConnectivityMonitor::new(api, flag.clone(), &config);

        monitor.tick().await;
        assert_eq!(flag.get(), ConnectivityState::Connected);
        monitor.tick().await;
        assert_eq!(flag.get(), ConnectivityState::Connected);
    }
}
