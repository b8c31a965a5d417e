//! Platform Connectivity Abstraction
//!
//! Exposes the host's "what network am I on right now" query. The host is
//! additionally expected to forward its connectivity-changed broadcast to the
//! controller's `connectivity_changed()` entry point; that signal carries no
//! payload, the controller always re-queries the current descriptor here.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Connection type codes as reported by the platform.
///
/// Values match the Android `ConnectivityManager` constants so host adapters
/// can pass platform integers through unchanged.
pub mod connection_type {
    pub const MOBILE: i32 = 0;
    pub const WIFI: i32 = 1;
    pub const ETHERNET: i32 = 9;
}

/// Mobile connection subtype codes (`TelephonyManager` network types).
pub mod connection_subtype {
    pub const UNKNOWN: i32 = 0;
    pub const GPRS: i32 = 1;
    pub const EDGE: i32 = 2;
    pub const UMTS: i32 = 3;
    pub const CDMA: i32 = 4;
    pub const EVDO_0: i32 = 5;
    pub const EVDO_A: i32 = 6;
    pub const RTT_1X: i32 = 7;
    pub const HSDPA: i32 = 8;
    pub const HSUPA: i32 = 9;
    pub const HSPA: i32 = 10;
    pub const IDEN: i32 = 11;
    pub const EVDO_B: i32 = 12;
    pub const LTE: i32 = 13;
    pub const EHRPD: i32 = 14;
    pub const HSPAP: i32 = 15;
}

/// Raw network descriptor supplied by the platform per connectivity event.
///
/// Ephemeral - the controller derives a speed class from it and does not
/// persist it beyond the current event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// Coarse connection type (see [`connection_type`]).
    pub connection_type: i32,
    /// Technology subtype, meaningful for mobile connections
    /// (see [`connection_subtype`]).
    pub connection_subtype: i32,
}

impl NetworkDescriptor {
    /// Create a descriptor from raw platform integers.
    pub fn new(connection_type: i32, connection_subtype: i32) -> Self {
        Self {
            connection_type,
            connection_subtype,
        }
    }

    /// Convenience constructor for a WiFi descriptor.
    pub fn wifi() -> Self {
        Self::new(connection_type::WIFI, connection_subtype::UNKNOWN)
    }

    /// Convenience constructor for a mobile descriptor with the given subtype.
    pub fn mobile(subtype: i32) -> Self {
        Self::new(connection_type::MOBILE, subtype)
    }
}

/// Current-network query consumed by the connectivity coordinator.
///
/// Returns `Ok(None)` when no network is active; that is a routine outcome,
/// not an error. Implementations map platform lookup failures to
/// `BridgeError`, which the coordinator also treats as "no descriptor".
#[async_trait]
pub trait ConnectivityProvider: Send + Sync {
    /// Query the descriptor of the currently active network, if any.
    async fn current_descriptor(&self) -> Result<Option<NetworkDescriptor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_constructors() {
        let wifi = NetworkDescriptor::wifi();
        assert_eq!(wifi.connection_type, connection_type::WIFI);

        let lte = NetworkDescriptor::mobile(connection_subtype::LTE);
        assert_eq!(lte.connection_type, connection_type::MOBILE);
        assert_eq!(lte.connection_subtype, connection_subtype::LTE);
    }

    #[test]
    fn descriptor_serialization_round_trip() {
        let descriptor = NetworkDescriptor::mobile(connection_subtype::HSDPA);
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: NetworkDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
