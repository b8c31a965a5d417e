//! # Controller Error Types
//!
//! Two kinds of failure live here: [`PlayerError`], the `Result` error of the
//! controller's own API surface, and [`PlayerErrorCode`], the integer codes
//! the engine and controller report through the error listener slot. Listener
//! codes are non-fatal conditions; the subscriber decides how to handle them
//! and signals consumption through its boolean return.

use thiserror::Error;

/// Error codes surfaced through the error listener slot.
///
/// The integer values are part of the host contract and match the engine's
/// reporting codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorCode {
    /// Unclassified failure.
    UnknownError,
    /// The selected source does not exist.
    NotFound,
    /// The source is recognized but cannot be played (e.g. `mms://`).
    NotSupported,
    /// The engine's pre-fetch buffer ran into an error state.
    ErrorBuffering,
    /// Buffer fill rate lags behind consumption.
    BufferSlow,
    /// Buffer filled back up after a slow phase.
    BufferFast,
}

impl PlayerErrorCode {
    /// Integer code as reported to the error listener.
    pub fn code(self) -> i32 {
        match self {
            PlayerErrorCode::UnknownError => -1,
            PlayerErrorCode::NotFound => -2,
            PlayerErrorCode::NotSupported => -3,
            PlayerErrorCode::ErrorBuffering => 2,
            PlayerErrorCode::BufferSlow => 3,
            PlayerErrorCode::BufferFast => 4,
        }
    }

    /// Map an engine-reported integer back to a code, if known.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(PlayerErrorCode::UnknownError),
            -2 => Some(PlayerErrorCode::NotFound),
            -3 => Some(PlayerErrorCode::NotSupported),
            2 => Some(PlayerErrorCode::ErrorBuffering),
            3 => Some(PlayerErrorCode::BufferSlow),
            4 => Some(PlayerErrorCode::BufferFast),
            _ => None,
        }
    }
}

/// Errors returned by the controller's API surface.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Configuration is invalid or incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Combined metadata string without the `" - "` separator.
    #[error("Malformed metadata string: {0:?}")]
    MetadataParse(String),

    /// The engine reported a state code outside its documented set.
    #[error("Unknown player state code: {0}")]
    UnknownStateCode(i32),

    /// The session was already released; the queue is gone.
    #[error("Playback session released")]
    SessionReleased,

    /// An engine command failed.
    #[error("Engine command failed: {0}")]
    Engine(#[from] bridge_traits::BridgeError),
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
