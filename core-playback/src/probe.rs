//! # Reachability Probe
//!
//! A short, bounded connection attempt against a well-known endpoint, fired
//! after every connectivity transition. The probe fetches nothing usable; it
//! exists to force the platform's network stack to establish a route
//! immediately after a handover instead of leaving that to the engine's next
//! request, which shortens the stall window after a WiFi/cellular switch.
//!
//! ## Guarantees
//!
//! - **Single-flight**: `start()` while an attempt is in flight is a safe
//!   no-op; at most one attempt exists per session at any instant.
//! - **Off-queue I/O**: the attempt runs on its own spawned task and never
//!   blocks the session queue.
//! - **Queue-ordered retries**: a failed attempt waits a flat delay and then
//!   re-posts a connectivity-changed event onto the session queue rather than
//!   calling itself, preserving single-queue ordering. Retries continue until
//!   an attempt succeeds or the session is released.
//! - **Release safety**: once the session liveness token is cancelled, a
//!   finishing attempt discards its retry instead of re-enqueuing.

use crate::config::ControllerConfig;
use crate::events::SessionEvent;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Transport seam for the probe's connection attempt.
///
/// The default [`TcpProbeTransport`] opens a real TCP connection; tests
/// substitute a deterministic implementation.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Attempt to reach `endpoint` within `timeout`; `true` on success.
    async fn reach(&self, endpoint: &str, timeout: Duration) -> bool;
}

/// TCP connect-based transport.
#[derive(Debug, Default)]
pub struct TcpProbeTransport;

#[async_trait]
impl ProbeTransport for TcpProbeTransport {
    async fn reach(&self, endpoint: &str, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, TcpStream::connect(endpoint)).await,
            Ok(Ok(_))
        )
    }
}

/// Single-flight reachability probe bound to one playback session.
pub struct ReachabilityProbe {
    endpoint: String,
    connect_timeout: Duration,
    retry_delay: Duration,
    transport: Arc<dyn ProbeTransport>,
    in_flight: Arc<AtomicBool>,
    liveness: CancellationToken,
    retry_queue: mpsc::UnboundedSender<SessionEvent>,
}

impl ReachabilityProbe {
    pub(crate) fn new(
        config: &ControllerConfig,
        transport: Arc<dyn ProbeTransport>,
        liveness: CancellationToken,
        retry_queue: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            endpoint: config.probe_endpoint.clone(),
            connect_timeout: config.probe_connect_timeout,
            retry_delay: config.probe_retry_delay,
            transport,
            in_flight: Arc::new(AtomicBool::new(false)),
            liveness,
            retry_queue,
        }
    }

    /// Begin a probe attempt unless one is already in flight.
    ///
    /// Success terminates silently. Failure clears the in-flight flag after
    /// the flat retry delay and re-posts a connectivity-changed event, unless
    /// the session has been released in the meantime.
    pub fn start(&self) {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("reachability probe already in flight, skipping");
            return;
        }

        let endpoint = self.endpoint.clone();
        let connect_timeout = self.connect_timeout;
        let retry_delay = self.retry_delay;
        let transport = Arc::clone(&self.transport);
        let in_flight = Arc::clone(&self.in_flight);
        let liveness = self.liveness.clone();
        let retry_queue = self.retry_queue.clone();

        tokio::spawn(async move {
            let reached = transport.reach(&endpoint, connect_timeout).await;
            if reached {
                debug!(endpoint = %endpoint, "reachability probe succeeded");
                in_flight.store(false, Ordering::Release);
                return;
            }

            debug!(
                endpoint = %endpoint,
                retry_delay_ms = retry_delay.as_millis() as u64,
                "reachability probe failed, scheduling retry"
            );
            tokio::time::sleep(retry_delay).await;
            in_flight.store(false, Ordering::Release);

            if liveness.is_cancelled() {
                debug!("session released, dropping probe retry");
                return;
            }
            let _ = retry_queue.send(SessionEvent::ConnectivityChanged);
        });
    }

    #[cfg(test)]
    fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ReachabilityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReachabilityProbe")
            .field("endpoint", &self.endpoint)
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish()
    }
}
