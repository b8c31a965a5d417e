//! # Playback State Machine
//!
//! Tracks the engine's coarse lifecycle state. Transitions happen only in
//! response to engine state callbacks or the explicit `reset`/`release`
//! paths; the controller never guesses state. Unknown state codes are a
//! contract violation of the engine collaborator and are rejected, never
//! coerced to a default.

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};

/// Coarse player lifecycle state, ordered by a numeric priority.
///
/// The priority exists for comparison only; no transition is gated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No state change pending since construction.
    Pending,
    /// Pipeline deallocated.
    Null,
    /// Pipeline allocated and ready to accept a source.
    Ready,
    /// Playback paused with position preserved.
    Paused,
    /// Actively rendering.
    Playing,
    /// Source fully prepared; terminal success marker distinct from
    /// `Playing`, gating readiness notifications.
    Prepared,
}

impl PlayerState {
    /// Numeric priority attribute of the state.
    pub fn priority(self) -> u8 {
        match self {
            PlayerState::Pending => 0,
            PlayerState::Null => 1,
            PlayerState::Ready => 2,
            PlayerState::Paused => 3,
            PlayerState::Playing => 4,
            PlayerState::Prepared => 5,
        }
    }

    /// Map an engine state code to a state.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::UnknownStateCode`] for codes outside 0..=5.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(PlayerState::Pending),
            1 => Ok(PlayerState::Null),
            2 => Ok(PlayerState::Ready),
            3 => Ok(PlayerState::Paused),
            4 => Ok(PlayerState::Playing),
            5 => Ok(PlayerState::Prepared),
            other => Err(PlayerError::UnknownStateCode(other)),
        }
    }
}

/// Session-scoped state tracker driven by engine callbacks.
#[derive(Debug)]
pub struct PlaybackStateMachine {
    current: PlayerState,
}

impl PlaybackStateMachine {
    /// New sessions start in `Pending` until the engine reports otherwise.
    pub fn new() -> Self {
        Self {
            current: PlayerState::Pending,
        }
    }

    /// Currently tracked state.
    pub fn current(&self) -> PlayerState {
        self.current
    }

    /// Apply an engine state callback.
    ///
    /// Performs no validation beyond mapping the code; the engine owns the
    /// transition logic.
    ///
    /// # Errors
    ///
    /// Unknown codes leave the tracked state untouched and return
    /// [`PlayerError::UnknownStateCode`].
    pub fn apply_code(&mut self, code: i32) -> Result<PlayerState> {
        let state = PlayerState::from_code(code)?;
        self.current = state;
        Ok(state)
    }

    /// Force the tracked state from an explicit controller path
    /// (`reset`/`release`).
    pub fn force(&mut self, state: PlayerState) {
        self.current = state;
    }
}

impl Default for PlaybackStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
