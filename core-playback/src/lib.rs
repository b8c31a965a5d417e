//! # Network-Adaptive Playback Session Controller
//!
//! Coordinates a platform media engine with live network conditions: one
//! controller per playback session, a single FIFO event queue for all
//! mutation, and an adaptive buffer policy driven by connectivity
//! classification.
//!
//! ## Overview
//!
//! This crate handles:
//! - Session lifecycle and transport commands over a [`MediaEngine`] seam
//! - Engine callback fan-in and single-slot listener dispatch
//! - Network classification (FAST/SLOW/UNKNOWN) from platform descriptors
//! - Buffer sizing policy keyed off the classification
//! - A single-flight reachability probe with queue-ordered retries
//!
//! Platform integrations implement the traits in `bridge-traits`; this crate
//! never touches platform APIs directly.
//!
//! [`MediaEngine`]: bridge_traits::MediaEngine

pub mod classifier;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod listener;
pub mod logging;
pub mod policy;
pub mod probe;
pub mod state;

mod events;

pub use classifier::{classify, estimated_downlink_kbps, NetworkClass};
pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::{EngineCallbackHandle, PlaybackController};
pub use error::{PlayerError, PlayerErrorCode, Result};
pub use listener::TrackMetadata;
pub use policy::BufferPolicy;
pub use probe::{ProbeTransport, TcpProbeTransport};
pub use state::PlayerState;
