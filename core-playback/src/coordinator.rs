//! # Connectivity Coordinator
//!
//! Handles each connectivity-changed unit of work on the session queue:
//! query the current descriptor, classify it, pick a buffer target, push the
//! result to the engine, and trigger the reachability probe exactly once.
//!
//! Descriptor query failures are routine (classified UNKNOWN) and are never
//! surfaced to the listener; connectivity hiccups are not playback errors.
//! The buffer target is mutated here and nowhere else.

use crate::classifier::{classify, NetworkClass};
use crate::config::ControllerConfig;
use crate::policy::BufferPolicy;
use crate::probe::ReachabilityProbe;
use bridge_traits::{ConnectivityProvider, MediaEngine};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-session connectivity handling, driven by the session worker.
pub struct ConnectivityCoordinator {
    connectivity: Arc<dyn ConnectivityProvider>,
    policy: BufferPolicy,
    fast_threshold_kbps: u32,
    probe: ReachabilityProbe,
    last_applied: Option<(NetworkClass, u32)>,
}

impl ConnectivityCoordinator {
    pub(crate) fn new(
        config: &ControllerConfig,
        connectivity: Arc<dyn ConnectivityProvider>,
        probe: ReachabilityProbe,
    ) -> Self {
        Self {
            connectivity,
            policy: BufferPolicy::from_config(config),
            fast_threshold_kbps: config.fast_threshold_kbps,
            probe,
            last_applied: None,
        }
    }

    /// Process one connectivity-changed event.
    ///
    /// Always runs on the session worker; the probe it triggers runs off it.
    /// Engine command failures are logged and swallowed - the next event
    /// re-queries and re-applies from scratch, so staleness self-heals.
    pub(crate) async fn handle_change(&mut self, engine: &dyn MediaEngine) {
        let descriptor = match self.connectivity.current_descriptor().await {
            Ok(descriptor) => descriptor,
            Err(error) => {
                debug!(%error, "network descriptor query failed, classifying unknown");
                None
            }
        };

        let class = classify(descriptor.as_ref(), self.fast_threshold_kbps);
        let target = self.policy.target_for(class);

        if self.last_applied != Some((class, target)) {
            info!(?class, target_bytes = target, "applying network classification");
            if let Err(error) = engine.network_change(class == NetworkClass::Fast).await {
                warn!(%error, "engine rejected network change hint");
            }
            if let Err(error) = engine.set_buffer_size(target).await {
                warn!(%error, "engine rejected buffer size update");
            }
            self.last_applied = Some((class, target));
        } else {
            debug!(?class, "classification unchanged, skipping engine update");
        }

        self.probe.start();
    }

    /// Last classification and buffer target pushed to the engine.
    pub fn last_applied(&self) -> Option<(NetworkClass, u32)> {
        self.last_applied
    }
}

impl std::fmt::Debug for ConnectivityCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityCoordinator")
            .field("fast_threshold_kbps", &self.fast_threshold_kbps)
            .field("last_applied", &self.last_applied)
            .finish()
    }
}
