//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and the host:
//! the native media-rendering engine and the platform connectivity facilities
//! are consumed exclusively through these traits, which keeps the core free of
//! platform code and lets tests substitute fakes.
//!
//! ## Traits
//!
//! - [`MediaEngine`](engine::MediaEngine) - command surface of the native
//!   render pipeline (source selection, transport, buffer sizing, volume)
//! - [`ConnectivityProvider`](network::ConnectivityProvider) - current network
//!   descriptor query backing the coarse speed classification
//!
//! ## Callback Surface
//!
//! The engine reports back through [`EngineEvent`](engine::EngineEvent)
//! values; the host adapter forwards them into the controller's callback
//! handle, which marshals them onto the single session queue.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert platform-specific errors to
//! `BridgeError` and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds; implementations are held
//! behind `Arc` and may be called from async tasks.

pub mod engine;
pub mod error;
pub mod network;

pub use error::BridgeError;

// Re-export commonly used types
pub use engine::{EngineEvent, MediaEngine};
pub use network::{connection_subtype, connection_type, ConnectivityProvider, NetworkDescriptor};
