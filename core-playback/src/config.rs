//! # Controller Configuration
//!
//! Builder-based configuration for the playback controller. All network
//! tuning knobs live here: the two-tier buffer targets, the FAST/SLOW
//! classification threshold, and the reachability probe parameters.
//!
//! ## Defaults
//!
//! | Knob | Default | Rationale |
//! |------|---------|-----------|
//! | `fast_buffer_bytes` | 2 MiB | deep pre-fetch so buffering rarely stalls on high-bandwidth links |
//! | `slow_buffer_bytes` | 256 KiB | shallow pre-fetch to minimize startup latency on slow links |
//! | `fast_threshold_kbps` | 1000 | estimated downlink at or above 1 Mbit/s classifies as FAST |
//! | `probe_endpoint` | `clients3.google.com:80` | well-known, always-up endpoint |
//! | `probe_connect_timeout` | 1500 ms | bounded route-establishment attempt |
//! | `probe_retry_delay` | 5 s | flat (non-exponential) retry cadence |
//!
//! The threshold is deliberately a tunable rather than a constant; deployments
//! disagree on where "fast enough" sits between hundreds of kilobits and
//! several megabits per second.
//!
//! ## Usage
//!
//! ```
//! use core_playback::config::ControllerConfig;
//! use std::time::Duration;
//!
//! let config = ControllerConfig::builder()
//!     .fast_buffer_bytes(4 * 1024 * 1024)
//!     .slow_buffer_bytes(128 * 1024)
//!     .fast_threshold_kbps(2000)
//!     .probe_retry_delay(Duration::from_secs(10))
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.fast_threshold_kbps, 2000);
//! ```

use crate::error::{PlayerError, Result};
use std::time::Duration;

/// Default deep pre-fetch target for FAST links.
pub const DEFAULT_FAST_BUFFER_BYTES: u32 = 2 * 1024 * 1024;

/// Default shallow pre-fetch target for SLOW/UNKNOWN links.
pub const DEFAULT_SLOW_BUFFER_BYTES: u32 = 256 * 1024;

/// Default FAST classification threshold in kbit/s.
pub const DEFAULT_FAST_THRESHOLD_KBPS: u32 = 1000;

/// Default reachability probe endpoint.
pub const DEFAULT_PROBE_ENDPOINT: &str = "clients3.google.com:80";

/// Configuration for a playback controller session.
///
/// Construct through [`ControllerConfig::builder`]; `build()` validates the
/// combination and fails fast with actionable messages.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Buffer target pushed to the engine when the network classifies FAST.
    pub fast_buffer_bytes: u32,

    /// Buffer target pushed to the engine for SLOW/UNKNOWN networks.
    pub slow_buffer_bytes: u32,

    /// Estimated-downlink threshold (kbit/s) separating FAST from SLOW.
    pub fast_threshold_kbps: u32,

    /// `host:port` endpoint the reachability probe connects to.
    pub probe_endpoint: String,

    /// Upper bound on a single probe connection attempt.
    pub probe_connect_timeout: Duration,

    /// Flat delay between a failed probe and its re-enqueued retry.
    pub probe_retry_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fast_buffer_bytes: DEFAULT_FAST_BUFFER_BYTES,
            slow_buffer_bytes: DEFAULT_SLOW_BUFFER_BYTES,
            fast_threshold_kbps: DEFAULT_FAST_THRESHOLD_KBPS,
            probe_endpoint: DEFAULT_PROBE_ENDPOINT.to_string(),
            probe_connect_timeout: Duration::from_millis(1500),
            probe_retry_delay: Duration::from_secs(5),
        }
    }
}

impl ControllerConfig {
    /// Creates a new builder for constructing a `ControllerConfig`.
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// Checks:
    /// - both buffer targets are non-zero
    /// - the FAST target is never smaller than the SLOW target (the buffer
    ///   policy must be monotone in the speed class)
    /// - the probe endpoint is non-empty
    /// - probe timings are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.slow_buffer_bytes == 0 || self.fast_buffer_bytes == 0 {
            return Err(PlayerError::Config(
                "Buffer targets must be greater than zero".to_string(),
            ));
        }

        if self.fast_buffer_bytes < self.slow_buffer_bytes {
            return Err(PlayerError::Config(format!(
                "FAST buffer target ({} bytes) must not be smaller than the SLOW target ({} bytes)",
                self.fast_buffer_bytes, self.slow_buffer_bytes
            )));
        }

        if self.probe_endpoint.is_empty() {
            return Err(PlayerError::Config(
                "Probe endpoint cannot be empty. Use .probe_endpoint() to set a host:port pair."
                    .to_string(),
            ));
        }

        if self.probe_connect_timeout.is_zero() {
            return Err(PlayerError::Config(
                "Probe connect timeout must be greater than zero".to_string(),
            ));
        }

        if self.probe_retry_delay.is_zero() {
            return Err(PlayerError::Config(
                "Probe retry delay must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ControllerConfig`] instances.
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    fast_buffer_bytes: Option<u32>,
    slow_buffer_bytes: Option<u32>,
    fast_threshold_kbps: Option<u32>,
    probe_endpoint: Option<String>,
    probe_connect_timeout: Option<Duration>,
    probe_retry_delay: Option<Duration>,
}

impl ControllerConfigBuilder {
    /// Sets the buffer target for FAST networks.
    pub fn fast_buffer_bytes(mut self, bytes: u32) -> Self {
        self.fast_buffer_bytes = Some(bytes);
        self
    }

    /// Sets the buffer target for SLOW/UNKNOWN networks.
    pub fn slow_buffer_bytes(mut self, bytes: u32) -> Self {
        self.slow_buffer_bytes = Some(bytes);
        self
    }

    /// Sets the FAST classification threshold in kbit/s.
    pub fn fast_threshold_kbps(mut self, kbps: u32) -> Self {
        self.fast_threshold_kbps = Some(kbps);
        self
    }

    /// Sets the reachability probe endpoint (`host:port`).
    pub fn probe_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.probe_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the upper bound on a single probe connection attempt.
    pub fn probe_connect_timeout(mut self, timeout: Duration) -> Self {
        self.probe_connect_timeout = Some(timeout);
        self
    }

    /// Sets the flat delay between a failed probe and its retry.
    pub fn probe_retry_delay(mut self, delay: Duration) -> Self {
        self.probe_retry_delay = Some(delay);
        self
    }

    /// Builds the final `ControllerConfig`, validating the combination.
    pub fn build(self) -> Result<ControllerConfig> {
        let defaults = ControllerConfig::default();

        let config = ControllerConfig {
            fast_buffer_bytes: self.fast_buffer_bytes.unwrap_or(defaults.fast_buffer_bytes),
            slow_buffer_bytes: self.slow_buffer_bytes.unwrap_or(defaults.slow_buffer_bytes),
            fast_threshold_kbps: self
                .fast_threshold_kbps
                .unwrap_or(defaults.fast_threshold_kbps),
            probe_endpoint: self.probe_endpoint.unwrap_or(defaults.probe_endpoint),
            probe_connect_timeout: self
                .probe_connect_timeout
                .unwrap_or(defaults.probe_connect_timeout),
            probe_retry_delay: self.probe_retry_delay.unwrap_or(defaults.probe_retry_delay),
        };

        config.validate()?;

        Ok(config)
    }
}
