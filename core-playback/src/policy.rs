//! # Buffer-Size Policy
//!
//! Maps a speed class to the byte target handed to the engine's pre-fetch
//! buffer. Two tiers only: a deep target for FAST links and a shallow target
//! for SLOW/UNKNOWN links. The mapping itself is pure; the connectivity
//! coordinator owns issuing the resulting `set_buffer_size` command and
//! skipping redundant re-issues.

use crate::classifier::NetworkClass;
use crate::config::ControllerConfig;

/// Two-tier buffer policy.
///
/// Monotone by construction: config validation guarantees the FAST target is
/// never smaller than the SLOW target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPolicy {
    fast_bytes: u32,
    slow_bytes: u32,
}

impl BufferPolicy {
    /// Build the policy from validated configuration.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            fast_bytes: config.fast_buffer_bytes,
            slow_bytes: config.slow_buffer_bytes,
        }
    }

    /// Target buffer size in bytes for the given speed class.
    ///
    /// UNKNOWN is treated like SLOW: with no descriptor available the cheap
    /// assumption is a constrained link.
    pub fn target_for(&self, class: NetworkClass) -> u32 {
        match class {
            NetworkClass::Fast => self.fast_bytes,
            NetworkClass::Slow | NetworkClass::Unknown => self.slow_bytes,
        }
    }
}
