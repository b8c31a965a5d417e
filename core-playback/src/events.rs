//! Internal items of the session event queue.
//!
//! Everything the session worker processes arrives as a [`SessionEvent`]:
//! marshaled facade commands, engine callbacks, and the payload-free
//! connectivity-changed signal (whether from the platform or a probe retry).

use crate::error::Result;
use crate::listener::{
    BufferingListener, ErrorListener, MetadataListener, StateListener, TimeListener, UnitListener,
};
use crate::state::PlayerState;
use bridge_traits::EngineEvent;
use tokio::sync::oneshot;

/// A listener being installed into its slot (last-write-wins).
pub(crate) enum ListenerSlot {
    Error(ErrorListener),
    Time(TimeListener),
    Buffering(BufferingListener),
    Completion(UnitListener),
    Ready(UnitListener),
    Prepared(UnitListener),
    PlayStarted(UnitListener),
    SeekComplete(UnitListener),
    Metadata(MetadataListener),
    State(StateListener),
}

/// Facade command marshaled onto the session queue.
pub(crate) enum Command {
    SetDataSource { uri: String, seek_on_ready: bool },
    Start,
    Pause,
    Stop,
    SeekTo { position_ms: i32 },
    SetVolume { left: f32, right: f32 },
    SetNotifyTime { interval_ms: i32 },
    EnableLogging { enable: bool },
    Reset,
    IsPlaying { reply: oneshot::Sender<Result<bool>> },
    Position { reply: oneshot::Sender<Result<i32>> },
    Duration { reply: oneshot::Sender<Result<i32>> },
    CurrentState { reply: oneshot::Sender<PlayerState> },
    SetListener { slot: ListenerSlot },
    Release { reply: Option<oneshot::Sender<()>> },
}

/// Unit of work on the single-consumer session queue, processed in FIFO
/// arrival order by the worker task that owns all session state.
pub(crate) enum SessionEvent {
    Command(Command),
    Engine(EngineEvent),
    ConnectivityChanged,
}
