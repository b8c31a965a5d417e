//! # Listener Registry & Metadata Parsing
//!
//! One slot per event kind, each holding at most one subscriber. Registering
//! a new listener replaces the previous one (last-write-wins). This is a
//! documented single-subscriber contract, not a multicast bus; consumers who
//! need fan-out wrap their own dispatch inside a single listener.
//!
//! Dispatch never panics: an empty slot silently drops the event.

use crate::error::{PlayerError, Result};
use crate::state::PlayerState;
use tracing::debug;

/// Error listener; returns `true` if it consumed the error.
pub type ErrorListener = Box<dyn FnMut(i32) -> bool + Send>;
/// Periodic time listener (position in milliseconds).
pub type TimeListener = Box<dyn FnMut(i32) + Send>;
/// Buffer fill-level listener (0-100).
pub type BufferingListener = Box<dyn FnMut(i32) + Send>;
/// Payload-free lifecycle listener (completion, prepared, ready,
/// play-started, seek-complete).
pub type UnitListener = Box<dyn FnMut() + Send>;
/// Parsed metadata listener.
pub type MetadataListener = Box<dyn FnMut(TrackMetadata) + Send>;
/// Player state-change listener.
pub type StateListener = Box<dyn FnMut(PlayerState) + Send>;

/// Parsed stream metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub title: String,
}

impl TrackMetadata {
    /// Parse the engine's combined `"artist - title"` string.
    ///
    /// Splits on the first literal `" - "` separator; the remainder is the
    /// title even if it contains further separators.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::MetadataParse`] when the separator is absent.
    /// Callers on the event path treat that as a logged no-op, never an
    /// out-of-bounds access.
    pub fn parse_combined(combined: &str) -> Result<Self> {
        let (artist, title) = combined
            .split_once(" - ")
            .ok_or_else(|| PlayerError::MetadataParse(combined.to_string()))?;

        Ok(Self {
            artist: artist.to_string(),
            title: title.to_string(),
        })
    }
}

/// The per-session listener slots, written only by registration commands and
/// read by the event-dispatch path on the session worker.
#[derive(Default)]
pub struct ListenerSet {
    pub(crate) on_error: Option<ErrorListener>,
    pub(crate) on_time: Option<TimeListener>,
    pub(crate) on_buffering: Option<BufferingListener>,
    pub(crate) on_completion: Option<UnitListener>,
    pub(crate) on_ready: Option<UnitListener>,
    pub(crate) on_prepared: Option<UnitListener>,
    pub(crate) on_play_started: Option<UnitListener>,
    pub(crate) on_seek_complete: Option<UnitListener>,
    pub(crate) on_metadata: Option<MetadataListener>,
    pub(crate) on_state: Option<StateListener>,
}

impl ListenerSet {
    /// Dispatch an error code; returns whether the listener consumed it.
    ///
    /// With no listener registered the error is unconsumed by definition.
    pub fn error(&mut self, code: i32) -> bool {
        match self.on_error.as_mut() {
            Some(listener) => listener(code),
            None => {
                debug!(code, "error event dropped, no listener registered");
                false
            }
        }
    }

    pub fn time(&mut self, position_ms: i32) {
        if let Some(listener) = self.on_time.as_mut() {
            listener(position_ms);
        }
    }

    pub fn buffering(&mut self, percent: i32) {
        if let Some(listener) = self.on_buffering.as_mut() {
            listener(percent);
        }
    }

    pub fn completion(&mut self) {
        if let Some(listener) = self.on_completion.as_mut() {
            listener();
        }
    }

    pub fn ready(&mut self) {
        if let Some(listener) = self.on_ready.as_mut() {
            listener();
        }
    }

    pub fn prepared(&mut self) {
        if let Some(listener) = self.on_prepared.as_mut() {
            listener();
        }
    }

    pub fn play_started(&mut self) {
        if let Some(listener) = self.on_play_started.as_mut() {
            listener();
        }
    }

    pub fn seek_complete(&mut self) {
        if let Some(listener) = self.on_seek_complete.as_mut() {
            listener();
        }
    }

    pub fn metadata(&mut self, metadata: TrackMetadata) {
        match self.on_metadata.as_mut() {
            Some(listener) => listener(metadata),
            None => debug!("metadata event dropped, no listener registered"),
        }
    }

    pub fn state(&mut self, state: PlayerState) {
        if let Some(listener) = self.on_state.as_mut() {
            listener(state);
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("error", &self.on_error.is_some())
            .field("time", &self.on_time.is_some())
            .field("buffering", &self.on_buffering.is_some())
            .field("completion", &self.on_completion.is_some())
            .field("ready", &self.on_ready.is_some())
            .field("prepared", &self.on_prepared.is_some())
            .field("play_started", &self.on_play_started.is_some())
            .field("seek_complete", &self.on_seek_complete.is_some())
            .field("metadata", &self.on_metadata.is_some())
            .field("state", &self.on_state.is_some())
            .finish()
    }
}
