//! # Playback Controller Facade
//!
//! The public surface of a playback session: data-source selection, transport
//! commands, position/duration/volume queries, listener registration, and the
//! connectivity entry point. One explicitly constructed controller per
//! session - there is no ambient singleton.
//!
//! ## Architecture
//!
//! ```text
//! UI ──────────────► PlaybackController ──┐
//! engine callbacks ─► EngineCallbackHandle ├─► session queue (FIFO, mpsc)
//! platform signal ──► connectivity_changed┘          │
//!                                                     ▼
//!                                          SessionWorker (one task,
//!                                          owns all session state)
//!                        ┌───────────────────┼────────────────────┐
//!                        ▼                   ▼                    ▼
//!                 MediaEngine     PlaybackStateMachine   ConnectivityCoordinator
//!                 (commands)        + ListenerSet          (+ ReachabilityProbe)
//! ```
//!
//! All session state lives inside the worker task; facade calls marshal onto
//! the queue, so no locks guard session state. Queries travel with a oneshot
//! reply channel and reflect the engine's last-known value, stale by at most
//! one queue turnaround.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::config::ControllerConfig;
//! use core_playback::controller::PlaybackController;
//! use std::sync::Arc;
//!
//! let controller = PlaybackController::new(
//!     ControllerConfig::default(),
//!     Arc::new(MyEngine::new()),
//!     Arc::new(MyConnectivity::new()),
//! )?;
//!
//! controller.set_on_metadata_listener(|meta| {
//!     println!("{} - {}", meta.artist, meta.title);
//! })?;
//! controller.set_data_source("https://example.com/stream.mp3", false)?;
//! controller.start()?;
//! ```

use crate::config::ControllerConfig;
use crate::coordinator::ConnectivityCoordinator;
use crate::error::{PlayerError, PlayerErrorCode, Result};
use crate::events::{Command, ListenerSlot, SessionEvent};
use crate::listener::{ListenerSet, TrackMetadata};
use crate::probe::{ProbeTransport, ReachabilityProbe, TcpProbeTransport};
use crate::state::{PlaybackStateMachine, PlayerState};
use bridge_traits::{ConnectivityProvider, EngineEvent, MediaEngine};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Facade over one playback session.
///
/// Construction spawns the session worker task, which exclusively owns the
/// engine handle and every piece of mutable session state. Dropping the
/// controller triggers a quiet release; explicit [`release`](Self::release)
/// is preferred and double release is a no-op.
pub struct PlaybackController {
    queue: mpsc::UnboundedSender<SessionEvent>,
}

impl PlaybackController {
    /// Create a session with the default TCP probe transport.
    ///
    /// Must be called within a tokio runtime; the session worker is spawned
    /// immediately and issues the engine `init` as its first action. An
    /// `init` failure is processed before any listener registration can
    /// have reached the worker, so it is observable only in the logs; the
    /// session stays up and later commands surface their own failures
    /// through the error listener as usual.
    pub fn new(
        config: ControllerConfig,
        engine: Arc<dyn MediaEngine>,
        connectivity: Arc<dyn ConnectivityProvider>,
    ) -> Result<Self> {
        Self::with_probe_transport(config, engine, connectivity, Arc::new(TcpProbeTransport))
    }

    /// Create a session with a custom probe transport (used by tests and
    /// hosts with their own socket policy).
    pub fn with_probe_transport(
        config: ControllerConfig,
        engine: Arc<dyn MediaEngine>,
        connectivity: Arc<dyn ConnectivityProvider>,
        probe_transport: Arc<dyn ProbeTransport>,
    ) -> Result<Self> {
        config.validate()?;

        let (queue, rx) = mpsc::unbounded_channel();
        let liveness = CancellationToken::new();
        let probe = ReachabilityProbe::new(
            &config,
            probe_transport,
            liveness.clone(),
            queue.clone(),
        );
        let coordinator = ConnectivityCoordinator::new(&config, connectivity, probe);

        let worker = SessionWorker {
            engine,
            rx,
            listeners: ListenerSet::default(),
            state: PlaybackStateMachine::new(),
            coordinator,
            liveness,
        };
        tokio::spawn(worker.run());

        Ok(Self { queue })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.queue
            .send(SessionEvent::Command(command))
            .map_err(|_| PlayerError::SessionReleased)
    }

    // ------------------------------------------------------------------
    // Data source & transport
    // ------------------------------------------------------------------

    /// Select the media source for this session, replacing any previous one.
    ///
    /// Routing happens by URI scheme on the session worker: `mms://` is
    /// rejected through the error callback path with NOT_SUPPORTED and no
    /// engine command; `http://`/`https://` route to the engine's network
    /// source; anything else routes to the local source.
    pub fn set_data_source<S: Into<String>>(&self, uri: S, seek_on_ready: bool) -> Result<()> {
        self.send(Command::SetDataSource {
            uri: uri.into(),
            seek_on_ready,
        })
    }

    /// Set the pipeline to PLAYING.
    pub fn start(&self) -> Result<()> {
        self.send(Command::Start)
    }

    /// Set the pipeline to PAUSED.
    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    /// Set the pipeline to STOPPED.
    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    /// Seek to an absolute position in milliseconds.
    pub fn seek_to(&self, position_ms: i32) -> Result<()> {
        self.send(Command::SeekTo { position_ms })
    }

    /// Set both channel volumes atomically as a single engine command.
    pub fn set_volume(&self, left: f32, right: f32) -> Result<()> {
        self.send(Command::SetVolume { left, right })
    }

    /// Configure the periodic time-callback cadence in milliseconds.
    pub fn set_notify_time(&self, interval_ms: i32) -> Result<()> {
        self.send(Command::SetNotifyTime { interval_ms })
    }

    /// Toggle the engine's diagnostic logging.
    pub fn enable_logging(&self, enable: bool) -> Result<()> {
        self.send(Command::EnableLogging { enable })
    }

    /// Drive the session back toward READY by issuing stop plus seek-to-zero.
    ///
    /// The pipeline is not re-initialized; the existing source selection
    /// survives a reset.
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether the pipeline is currently playing.
    pub async fn is_playing(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::IsPlaying { reply })?;
        rx.await.map_err(|_| PlayerError::SessionReleased)?
    }

    /// Engine's last-known playback position in milliseconds.
    pub async fn position(&self) -> Result<i32> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Position { reply })?;
        rx.await.map_err(|_| PlayerError::SessionReleased)?
    }

    /// Engine's last-known media duration in milliseconds.
    pub async fn duration(&self) -> Result<i32> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Duration { reply })?;
        rx.await.map_err(|_| PlayerError::SessionReleased)?
    }

    /// Currently tracked coarse player state.
    pub async fn current_state(&self) -> Result<PlayerState> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::CurrentState { reply })?;
        rx.await.map_err(|_| PlayerError::SessionReleased)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tear the session down, finalizing the engine exactly once.
    ///
    /// Safe to call repeatedly; a second call (or a drop after an explicit
    /// release) is a no-op. Engine teardown failures are swallowed at this
    /// boundary - teardown always completes from the caller's perspective.
    pub async fn release(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        if self
            .send(Command::Release {
                reply: Some(reply),
            })
            .is_err()
        {
            // Session already gone.
            return Ok(());
        }
        let _ = rx.await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inbound signals
    // ------------------------------------------------------------------

    /// Marshal the platform's connectivity-changed signal onto the session
    /// queue. Carries no payload; the coordinator re-queries the current
    /// descriptor when the unit of work is processed.
    pub fn connectivity_changed(&self) {
        let _ = self.queue.send(SessionEvent::ConnectivityChanged);
    }

    /// Clonable handle the host wires engine callbacks into.
    pub fn callback_handle(&self) -> EngineCallbackHandle {
        EngineCallbackHandle {
            queue: self.queue.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Listener registration (single slot per kind, last-write-wins)
    // ------------------------------------------------------------------

    fn set_listener(&self, slot: ListenerSlot) -> Result<()> {
        self.send(Command::SetListener { slot })
    }

    /// Register the error listener; its boolean return signals consumption.
    pub fn set_on_error_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(i32) -> bool + Send + 'static,
    {
        self.set_listener(ListenerSlot::Error(Box::new(listener)))
    }

    /// Register the periodic time listener.
    pub fn set_on_time_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.set_listener(ListenerSlot::Time(Box::new(listener)))
    }

    /// Register the buffer fill-level listener.
    pub fn set_on_buffering_update_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.set_listener(ListenerSlot::Buffering(Box::new(listener)))
    }

    /// Register the play-complete listener.
    pub fn set_on_completion_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_listener(ListenerSlot::Completion(Box::new(listener)))
    }

    /// Register the engine-ready listener.
    pub fn set_on_ready_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_listener(ListenerSlot::Ready(Box::new(listener)))
    }

    /// Register the source-prepared listener.
    pub fn set_on_prepared_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_listener(ListenerSlot::Prepared(Box::new(listener)))
    }

    /// Register the play-started listener.
    pub fn set_on_play_started_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_listener(ListenerSlot::PlayStarted(Box::new(listener)))
    }

    /// Register the seek-complete listener.
    pub fn set_on_seek_complete_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.set_listener(ListenerSlot::SeekComplete(Box::new(listener)))
    }

    /// Register the parsed-metadata listener.
    pub fn set_on_metadata_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(TrackMetadata) + Send + 'static,
    {
        self.set_listener(ListenerSlot::Metadata(Box::new(listener)))
    }

    /// Register the state-change listener.
    pub fn set_on_state_listener<F>(&self, listener: F) -> Result<()>
    where
        F: FnMut(PlayerState) + Send + 'static,
    {
        self.set_listener(ListenerSlot::State(Box::new(listener)))
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        // Finalizer-path release; a no-op if release() already ran.
        let _ = self
            .queue
            .send(SessionEvent::Command(Command::Release { reply: None }));
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("released", &self.queue.is_closed())
            .finish()
    }
}

/// Inbound callback surface handed to the host's engine adapter.
///
/// Each method marshals one engine callback onto the session queue; after
/// release the events are silently discarded.
#[derive(Clone)]
pub struct EngineCallbackHandle {
    queue: mpsc::UnboundedSender<SessionEvent>,
}

impl EngineCallbackHandle {
    fn forward(&self, event: EngineEvent) {
        if self.queue.send(SessionEvent::Engine(event)).is_err() {
            debug!("engine callback dropped, session released");
        }
    }

    pub fn on_error(&self, code: i32) {
        self.forward(EngineEvent::Error { code });
    }

    pub fn on_time(&self, position_ms: i32) {
        self.forward(EngineEvent::Time { position_ms });
    }

    pub fn on_play_complete(&self) {
        self.forward(EngineEvent::PlayComplete);
    }

    pub fn on_ready(&self) {
        self.forward(EngineEvent::Ready);
    }

    pub fn on_prepared(&self) {
        self.forward(EngineEvent::Prepared);
    }

    pub fn on_play_started(&self) {
        self.forward(EngineEvent::PlayStarted);
    }

    pub fn on_buffering_update(&self, percent: i32) {
        self.forward(EngineEvent::BufferingUpdate { percent });
    }

    pub fn on_seek_complete(&self) {
        self.forward(EngineEvent::SeekComplete);
    }

    pub fn on_metadata<S: Into<String>>(&self, combined: S) {
        self.forward(EngineEvent::Metadata {
            combined: combined.into(),
        });
    }

    pub fn on_player_state(&self, code: i32) {
        self.forward(EngineEvent::State { code });
    }
}

impl std::fmt::Debug for EngineCallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCallbackHandle").finish()
    }
}

// ============================================================================
// Session worker
// ============================================================================

/// The single consumer of the session queue; owns every piece of mutable
/// session state and the exclusive engine handle.
struct SessionWorker {
    engine: Arc<dyn MediaEngine>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    listeners: ListenerSet,
    state: PlaybackStateMachine,
    coordinator: ConnectivityCoordinator,
    liveness: CancellationToken,
}

impl SessionWorker {
    async fn run(mut self) {
        if let Err(error) = self.engine.init().await {
            warn!(%error, "engine init failed");
            self.report_error(PlayerErrorCode::UnknownError.code());
        }

        while let Some(event) = self.rx.recv().await {
            match event {
                SessionEvent::Command(command) => {
                    if self.handle_command(command).await {
                        break;
                    }
                }
                SessionEvent::Engine(event) => self.handle_engine_event(event),
                SessionEvent::ConnectivityChanged => {
                    self.coordinator.handle_change(self.engine.as_ref()).await;
                }
            }
        }

        debug!("session worker stopped");
    }

    /// Dispatch an error code through the listener slot.
    fn report_error(&mut self, code: i32) {
        let consumed = self.listeners.error(code);
        if !consumed {
            debug!(code, "error not consumed by listener");
        }
    }

    /// Surface a pass-through command failure via the error callback path;
    /// facade commands never return engine faults directly.
    fn forward_outcome(&mut self, outcome: bridge_traits::error::Result<()>) {
        if let Err(error) = outcome {
            warn!(%error, "engine command failed");
            self.report_error(PlayerErrorCode::UnknownError.code());
        }
    }

    /// Returns `true` when the session should stop processing events.
    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::SetDataSource { uri, seek_on_ready } => {
                if uri.starts_with("mms://") {
                    debug!(uri, "rejecting unsupported source scheme");
                    self.report_error(PlayerErrorCode::NotSupported.code());
                } else if uri.starts_with("http://") || uri.starts_with("https://") {
                    let outcome = self.engine.set_url(&uri, seek_on_ready).await;
                    self.forward_outcome(outcome);
                } else {
                    let outcome = self.engine.set_uri(&uri, seek_on_ready).await;
                    self.forward_outcome(outcome);
                }
            }
            Command::Start => {
                let outcome = self.engine.play().await;
                self.forward_outcome(outcome);
            }
            Command::Pause => {
                let outcome = self.engine.pause().await;
                self.forward_outcome(outcome);
            }
            Command::Stop => {
                let outcome = self.engine.stop().await;
                self.forward_outcome(outcome);
            }
            Command::SeekTo { position_ms } => {
                let outcome = self.engine.set_position(position_ms).await;
                self.forward_outcome(outcome);
            }
            Command::SetVolume { left, right } => {
                let outcome = self.engine.set_volume(left, right).await;
                self.forward_outcome(outcome);
            }
            Command::SetNotifyTime { interval_ms } => {
                let outcome = self.engine.set_notify_time(interval_ms).await;
                self.forward_outcome(outcome);
            }
            Command::EnableLogging { enable } => {
                let outcome = self.engine.enable_logging(enable).await;
                self.forward_outcome(outcome);
            }
            Command::Reset => {
                // Stop + seek-to-zero; the pipeline is not re-initialized.
                let outcome = self.engine.stop().await;
                self.forward_outcome(outcome);
                let outcome = self.engine.set_position(0).await;
                self.forward_outcome(outcome);
                self.state.force(PlayerState::Ready);
            }
            Command::IsPlaying { reply } => {
                let _ = reply.send(self.engine.is_playing().await.map_err(Into::into));
            }
            Command::Position { reply } => {
                let _ = reply.send(self.engine.position().await.map_err(Into::into));
            }
            Command::Duration { reply } => {
                let _ = reply.send(self.engine.duration().await.map_err(Into::into));
            }
            Command::CurrentState { reply } => {
                let _ = reply.send(self.state.current());
            }
            Command::SetListener { slot } => self.install_listener(slot),
            Command::Release { reply } => {
                self.release().await;
                if let Some(reply) = reply {
                    let _ = reply.send(());
                }
                return true;
            }
        }
        false
    }

    fn install_listener(&mut self, slot: ListenerSlot) {
        match slot {
            ListenerSlot::Error(listener) => self.listeners.on_error = Some(listener),
            ListenerSlot::Time(listener) => self.listeners.on_time = Some(listener),
            ListenerSlot::Buffering(listener) => self.listeners.on_buffering = Some(listener),
            ListenerSlot::Completion(listener) => self.listeners.on_completion = Some(listener),
            ListenerSlot::Ready(listener) => self.listeners.on_ready = Some(listener),
            ListenerSlot::Prepared(listener) => self.listeners.on_prepared = Some(listener),
            ListenerSlot::PlayStarted(listener) => self.listeners.on_play_started = Some(listener),
            ListenerSlot::SeekComplete(listener) => {
                self.listeners.on_seek_complete = Some(listener)
            }
            ListenerSlot::Metadata(listener) => self.listeners.on_metadata = Some(listener),
            ListenerSlot::State(listener) => self.listeners.on_state = Some(listener),
        }
    }

    async fn release(&mut self) {
        // Stop scheduling probes first so an in-flight attempt finishing
        // after this point discards its retry.
        self.liveness.cancel();
        if let Err(error) = self.engine.finalize().await {
            warn!(%error, "engine finalize failed, ignoring");
        }
        self.state.force(PlayerState::Null);
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Error { code } => {
                // Unrecognized codes are still dispatched; the listener
                // contract is the raw integer, not the known-code table.
                match PlayerErrorCode::from_code(code) {
                    Some(known) => debug!(code, ?known, "engine reported error"),
                    None => warn!(code, "engine reported unrecognized error code"),
                }
                self.report_error(code);
            }
            EngineEvent::Time { position_ms } => self.listeners.time(position_ms),
            EngineEvent::PlayComplete => self.listeners.completion(),
            EngineEvent::Ready => self.listeners.ready(),
            EngineEvent::Prepared => self.listeners.prepared(),
            EngineEvent::PlayStarted => self.listeners.play_started(),
            EngineEvent::BufferingUpdate { percent } => self.listeners.buffering(percent),
            EngineEvent::SeekComplete => self.listeners.seek_complete(),
            EngineEvent::Metadata { combined } => {
                match TrackMetadata::parse_combined(&combined) {
                    Ok(metadata) => self.listeners.metadata(metadata),
                    Err(error) => warn!(%error, "dropping malformed metadata callback"),
                }
            }
            EngineEvent::State { code } => match self.state.apply_code(code) {
                Ok(state) => self.listeners.state(state),
                Err(error) => warn!(%error, "rejecting unknown engine state code"),
            },
        }
    }
}
