//! # Network Speed Classification
//!
//! Maps a raw platform network descriptor to a coarse speed class. The
//! classification is a pure, total function: every representable descriptor
//! maps to exactly one class, and `Unknown` is reserved for "no descriptor
//! available" (no active network, or the platform query failed).
//!
//! The FAST/SLOW split compares an estimated downlink rate against the
//! configured threshold. The per-subtype estimates are conservative mid-range
//! figures for each mobile technology generation; WiFi and ethernet are
//! assumed fast.

use bridge_traits::network::{connection_subtype as subtype, connection_type, NetworkDescriptor};
use serde::{Deserialize, Serialize};

/// Coarse network speed class derived from a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkClass {
    /// High-throughput link; deep buffering pays off.
    Fast,
    /// Low-throughput link; shallow buffering keeps startup latency down.
    Slow,
    /// No descriptor available.
    Unknown,
}

/// Assumed downlink rate for WiFi/ethernet links, kbit/s.
const WIRED_OR_WIFI_KBPS: u32 = 20_000;

/// Estimated downlink rate for a descriptor, in kbit/s.
///
/// Unrecognized connection types and subtypes estimate to 0 so that they can
/// never classify FAST on an arbitrary threshold.
pub fn estimated_downlink_kbps(descriptor: &NetworkDescriptor) -> u32 {
    match descriptor.connection_type {
        connection_type::WIFI | connection_type::ETHERNET => WIRED_OR_WIFI_KBPS,
        connection_type::MOBILE => match descriptor.connection_subtype {
            subtype::GPRS => 100,
            subtype::EDGE => 237,
            subtype::UMTS => 400,
            subtype::CDMA => 64,
            subtype::EVDO_0 => 500,
            subtype::EVDO_A => 700,
            subtype::RTT_1X => 50,
            subtype::HSDPA => 2_000,
            subtype::HSUPA => 1_000,
            subtype::HSPA => 700,
            subtype::IDEN => 25,
            subtype::EVDO_B => 5_000,
            subtype::LTE => 10_000,
            subtype::EHRPD => 1_000,
            subtype::HSPAP => 10_000,
            _ => 0,
        },
        _ => 0,
    }
}

/// Classify a descriptor against the configured FAST threshold.
///
/// Pure function, no side effects, no I/O. `None` always classifies
/// `Unknown`, never `Fast` or `Slow`.
pub fn classify(descriptor: Option<&NetworkDescriptor>, fast_threshold_kbps: u32) -> NetworkClass {
    match descriptor {
        None => NetworkClass::Unknown,
        Some(d) => {
            if estimated_downlink_kbps(d) >= fast_threshold_kbps {
                NetworkClass::Fast
            } else {
                NetworkClass::Slow
            }
        }
    }
}
