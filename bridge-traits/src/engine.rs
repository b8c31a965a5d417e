//! Media Engine Abstraction
//!
//! Defines the command surface of the native media-rendering engine and the
//! callback events it delivers back to the controller.
//!
//! ## Overview
//!
//! The engine is opaque to the core: it builds the render pipeline, decodes
//! and renders media, and keeps its own seek/position/duration bookkeeping.
//! The core only issues commands through [`MediaEngine`] and receives
//! [`EngineEvent`] callbacks, which the host marshals onto the controller's
//! event queue.
//!
//! ## Threading Model
//!
//! Implementations must be `Send + Sync`; the controller holds the engine
//! behind an `Arc` and calls it exclusively from its session worker task.
//! Command methods are expected to return quickly - long-running work happens
//! inside the engine and completion is signalled through callbacks.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::engine::MediaEngine;
//!
//! async fn startup(engine: &dyn MediaEngine) -> bridge_traits::error::Result<()> {
//!     engine.init().await?;
//!     engine.set_url("https://example.com/stream.mp3", false).await?;
//!     engine.play().await
//! }
//! ```

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Command interface consumed by the controller.
///
/// Mirrors the native engine's command set one-to-one. Every method is
/// fallible; the controller decides whether a failure is surfaced through the
/// error callback path or swallowed (teardown).
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Build the render pipeline and prepare the engine for commands.
    async fn init(&self) -> Result<()>;

    /// Destroy the pipeline and shut the engine down.
    ///
    /// The controller guarantees this is issued at most once per session.
    async fn finalize(&self) -> Result<()>;

    /// Select a local media source.
    async fn set_uri(&self, uri: &str, seek_on_ready: bool) -> Result<()>;

    /// Select a network media source.
    async fn set_url(&self, url: &str, seek_on_ready: bool) -> Result<()>;

    /// Seek to an absolute position in milliseconds.
    async fn set_position(&self, position_ms: i32) -> Result<()>;

    /// Configure the cadence of periodic time callbacks, in milliseconds.
    async fn set_notify_time(&self, interval_ms: i32) -> Result<()>;

    /// Last-known playback position in milliseconds.
    async fn position(&self) -> Result<i32>;

    /// Last-known media duration in milliseconds.
    async fn duration(&self) -> Result<i32>;

    /// Set the pipeline to PLAYING.
    async fn play(&self) -> Result<()>;

    /// Set the pipeline to PAUSED.
    async fn pause(&self) -> Result<()>;

    /// Set the pipeline to STOPPED.
    async fn stop(&self) -> Result<()>;

    /// Engine-internal reset of the current source.
    async fn reset(&self) -> Result<()>;

    /// Hint how many bytes the engine should pre-fetch before/while playing.
    async fn set_buffer_size(&self, bytes: u32) -> Result<()>;

    /// Whether the pipeline is currently playing.
    async fn is_playing(&self) -> Result<bool>;

    /// Set both channel volumes atomically, range `[0.0, 1.0]` per channel.
    async fn set_volume(&self, left: f32, right: f32) -> Result<()>;

    /// Toggle the engine's own diagnostic logging.
    async fn enable_logging(&self, enable: bool) -> Result<()>;

    /// Inform the engine about a coarse network speed transition.
    async fn network_change(&self, fast: bool) -> Result<()>;
}

/// Callback events delivered by the engine.
///
/// The host adapter translates native callbacks into this enum and feeds them
/// to the controller's callback handle; they are processed in arrival order on
/// the session queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    /// A reported, non-fatal error condition.
    Error {
        /// Engine error code (see the controller's error-code table).
        code: i32,
    },
    /// Periodic time notification.
    Time {
        /// Current position in milliseconds.
        position_ms: i32,
    },
    /// The current source played to completion.
    PlayComplete,
    /// The engine finished initialization and accepts commands.
    Ready,
    /// The selected source is prepared for playback.
    Prepared,
    /// Rendering of the current source actually started.
    PlayStarted,
    /// Pre-fetch buffer fill level changed.
    BufferingUpdate {
        /// Fill level, 0-100.
        percent: i32,
    },
    /// A previously issued seek finished.
    SeekComplete,
    /// Stream metadata update as a combined "artist - title" string.
    Metadata {
        /// Raw combined string as delivered by the engine.
        combined: String,
    },
    /// The pipeline transitioned to a new coarse state.
    State {
        /// Engine state code, mapped by the controller's state machine.
        code: i32,
    },
}
