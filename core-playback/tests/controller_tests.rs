//! Integration tests for the playback controller facade.
//!
//! Drives a full controller against a recording engine and a scripted
//! connectivity provider. Commands are fire-and-forget, so tests use an
//! awaited query as a queue barrier: the queue is FIFO, so once a later
//! query has answered, every earlier command has been processed.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    connection_subtype, BridgeError, ConnectivityProvider, MediaEngine, NetworkDescriptor,
};
use core_playback::{
    ControllerConfig, NetworkClass, PlaybackController, PlayerErrorCode, PlayerState,
    ProbeTransport, TrackMetadata,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine that records every command it receives.
#[derive(Default)]
struct RecordingEngine {
    commands: Mutex<Vec<String>>,
    playing: AtomicBool,
    fail_init: AtomicBool,
    fail_play: AtomicBool,
}

impl RecordingEngine {
    fn record(&self, command: impl Into<String>) {
        self.commands.lock().unwrap().push(command.into());
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaEngine for RecordingEngine {
    async fn init(&self) -> BridgeResult<()> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("pipeline build failed".into()));
        }
        self.record("init");
        Ok(())
    }

    async fn finalize(&self) -> BridgeResult<()> {
        self.record("finalize");
        Ok(())
    }

    async fn set_uri(&self, uri: &str, seek_on_ready: bool) -> BridgeResult<()> {
        self.record(format!("set_uri {uri} {seek_on_ready}"));
        Ok(())
    }

    async fn set_url(&self, url: &str, seek_on_ready: bool) -> BridgeResult<()> {
        self.record(format!("set_url {url} {seek_on_ready}"));
        Ok(())
    }

    async fn set_position(&self, position_ms: i32) -> BridgeResult<()> {
        self.record(format!("set_position {position_ms}"));
        Ok(())
    }

    async fn set_notify_time(&self, interval_ms: i32) -> BridgeResult<()> {
        self.record(format!("set_notify_time {interval_ms}"));
        Ok(())
    }

    async fn position(&self) -> BridgeResult<i32> {
        Ok(1234)
    }

    async fn duration(&self) -> BridgeResult<i32> {
        Ok(60_000)
    }

    async fn play(&self) -> BridgeResult<()> {
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("pipeline stalled".into()));
        }
        self.record("play");
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.record("pause");
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> BridgeResult<()> {
        self.record("stop");
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn reset(&self) -> BridgeResult<()> {
        self.record("reset");
        Ok(())
    }

    async fn set_buffer_size(&self, bytes: u32) -> BridgeResult<()> {
        self.record(format!("set_buffer_size {bytes}"));
        Ok(())
    }

    async fn is_playing(&self) -> BridgeResult<bool> {
        Ok(self.playing.load(Ordering::SeqCst))
    }

    async fn set_volume(&self, left: f32, right: f32) -> BridgeResult<()> {
        self.record(format!("set_volume {left} {right}"));
        Ok(())
    }

    async fn enable_logging(&self, enable: bool) -> BridgeResult<()> {
        self.record(format!("enable_logging {enable}"));
        Ok(())
    }

    async fn network_change(&self, fast: bool) -> BridgeResult<()> {
        self.record(format!("network_change {fast}"));
        Ok(())
    }
}

/// Connectivity provider whose descriptor can be swapped mid-test.
struct ScriptedConnectivity {
    descriptor: Mutex<Option<NetworkDescriptor>>,
}

impl ScriptedConnectivity {
    fn new(descriptor: Option<NetworkDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            descriptor: Mutex::new(descriptor),
        })
    }

    fn set(&self, descriptor: Option<NetworkDescriptor>) {
        *self.descriptor.lock().unwrap() = descriptor;
    }
}

#[async_trait]
impl ConnectivityProvider for ScriptedConnectivity {
    async fn current_descriptor(&self) -> BridgeResult<Option<NetworkDescriptor>> {
        Ok(self.descriptor.lock().unwrap().clone())
    }
}

/// Probe transport that always reaches the endpoint without touching sockets.
struct AlwaysReachable;

#[async_trait]
impl ProbeTransport for AlwaysReachable {
    async fn reach(&self, _endpoint: &str, _timeout: Duration) -> bool {
        true
    }
}

fn controller_with(
    engine: Arc<RecordingEngine>,
    connectivity: Arc<ScriptedConnectivity>,
) -> PlaybackController {
    PlaybackController::with_probe_transport(
        ControllerConfig::default(),
        engine,
        connectivity,
        Arc::new(AlwaysReachable),
    )
    .unwrap()
}

/// Await a query so everything queued before it is known to be processed.
async fn barrier(controller: &PlaybackController) {
    controller.current_state().await.unwrap();
}

// ----------------------------------------------------------------------------
// Data source routing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn http_sources_route_to_the_network_path() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller
        .set_data_source("https://example.com/stream.mp3", true)
        .unwrap();
    controller
        .set_data_source("http://example.com/other.mp3", false)
        .unwrap();
    barrier(&controller).await;

    let commands = engine.commands();
    assert!(commands.contains(&"set_url https://example.com/stream.mp3 true".to_string()));
    assert!(commands.contains(&"set_url http://example.com/other.mp3 false".to_string()));
}

#[tokio::test]
async fn local_sources_route_to_the_uri_path() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller
        .set_data_source("file:///music/track.flac", false)
        .unwrap();
    barrier(&controller).await;

    assert!(engine
        .commands()
        .contains(&"set_uri file:///music/track.flac false".to_string()));
}

#[tokio::test]
async fn mms_sources_are_rejected_without_an_engine_command() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    controller
        .set_on_error_listener(move |code| {
            sink.lock().unwrap().push(code);
            true
        })
        .unwrap();

    controller
        .set_data_source("mms://legacy.example.com/stream", false)
        .unwrap();
    barrier(&controller).await;

    assert_eq!(
        reported.lock().unwrap().as_slice(),
        &[PlayerErrorCode::NotSupported.code()]
    );
    let commands = engine.commands();
    assert!(!commands.iter().any(|c| c.contains("mms://")));
}

// ----------------------------------------------------------------------------
// Transport commands & queries
// ----------------------------------------------------------------------------

#[tokio::test]
async fn transport_commands_pass_through_in_order() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller.start().unwrap();
    controller.pause().unwrap();
    controller.seek_to(45_000).unwrap();
    controller.set_volume(0.8, 0.8).unwrap();
    controller.set_notify_time(500).unwrap();
    controller.stop().unwrap();
    barrier(&controller).await;

    assert_eq!(
        engine.commands(),
        vec![
            "init",
            "play",
            "pause",
            "set_position 45000",
            "set_volume 0.8 0.8",
            "set_notify_time 500",
            "stop",
        ]
    );
}

#[tokio::test]
async fn queries_reflect_the_engine() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    assert!(!controller.is_playing().await.unwrap());
    controller.start().unwrap();
    assert!(controller.is_playing().await.unwrap());

    assert_eq!(controller.position().await.unwrap(), 1234);
    assert_eq!(controller.duration().await.unwrap(), 60_000);
    assert_eq!(
        controller.current_state().await.unwrap(),
        PlayerState::Pending
    );
}

#[tokio::test]
async fn engine_faults_surface_through_the_error_listener() {
    let engine = Arc::new(RecordingEngine::default());
    engine.fail_play.store(true, Ordering::SeqCst);
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    controller
        .set_on_error_listener(move |code| {
            sink.lock().unwrap().push(code);
            true
        })
        .unwrap();

    controller.start().unwrap();
    barrier(&controller).await;

    assert_eq!(
        reported.lock().unwrap().as_slice(),
        &[PlayerErrorCode::UnknownError.code()]
    );
}

#[tokio::test]
async fn reset_stops_and_seeks_to_zero() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller.start().unwrap();
    controller.reset().unwrap();
    barrier(&controller).await;

    assert_eq!(
        engine.commands(),
        vec!["init", "play", "stop", "set_position 0"]
    );
    assert_eq!(controller.current_state().await.unwrap(), PlayerState::Ready);
}

// ----------------------------------------------------------------------------
// Connectivity handling
// ----------------------------------------------------------------------------

#[tokio::test]
async fn wifi_applies_the_fast_buffer_profile() {
    let engine = Arc::new(RecordingEngine::default());
    let connectivity = ScriptedConnectivity::new(Some(NetworkDescriptor::wifi()));
    let controller = controller_with(engine.clone(), connectivity);

    controller.connectivity_changed();
    barrier(&controller).await;

    let commands = engine.commands();
    assert!(commands.contains(&"network_change true".to_string()));
    assert!(commands.contains(&format!(
        "set_buffer_size {}",
        ControllerConfig::default().fast_buffer_bytes
    )));
}

#[tokio::test]
async fn missing_descriptor_applies_the_slow_buffer_profile() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller.connectivity_changed();
    barrier(&controller).await;

    let commands = engine.commands();
    assert!(commands.contains(&"network_change false".to_string()));
    assert!(commands.contains(&format!(
        "set_buffer_size {}",
        ControllerConfig::default().slow_buffer_bytes
    )));
}

#[tokio::test]
async fn legacy_mobile_subtype_is_slow() {
    let engine = Arc::new(RecordingEngine::default());
    let connectivity = ScriptedConnectivity::new(Some(NetworkDescriptor::mobile(
        connection_subtype::EDGE,
    )));
    let controller = controller_with(engine.clone(), connectivity);

    controller.connectivity_changed();
    barrier(&controller).await;

    assert!(engine
        .commands()
        .contains(&"network_change false".to_string()));
}

#[tokio::test]
async fn unchanged_classification_is_not_reapplied() {
    let engine = Arc::new(RecordingEngine::default());
    let connectivity = ScriptedConnectivity::new(Some(NetworkDescriptor::wifi()));
    let controller = controller_with(engine.clone(), connectivity.clone());

    controller.connectivity_changed();
    controller.connectivity_changed();
    controller.connectivity_changed();
    barrier(&controller).await;

    let hints = engine
        .commands()
        .iter()
        .filter(|c| c.starts_with("network_change"))
        .count();
    assert_eq!(hints, 1);
}

#[tokio::test]
async fn classification_transitions_reapply_the_policy() {
    let engine = Arc::new(RecordingEngine::default());
    let connectivity = ScriptedConnectivity::new(Some(NetworkDescriptor::wifi()));
    let controller = controller_with(engine.clone(), connectivity.clone());

    controller.connectivity_changed();
    barrier(&controller).await;

    connectivity.set(Some(NetworkDescriptor::mobile(connection_subtype::GPRS)));
    controller.connectivity_changed();
    barrier(&controller).await;

    let hints: Vec<String> = engine
        .commands()
        .into_iter()
        .filter(|c| c.starts_with("network_change"))
        .collect();
    assert_eq!(hints, vec!["network_change true", "network_change false"]);
}

// ----------------------------------------------------------------------------
// Engine callback dispatch
// ----------------------------------------------------------------------------

#[tokio::test]
async fn metadata_callbacks_are_parsed_before_dispatch() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    controller
        .set_on_metadata_listener(move |meta: TrackMetadata| {
            sink.lock().unwrap().push(meta);
        })
        .unwrap();
    barrier(&controller).await;

    callbacks.on_metadata("Some Artist - Some Title");
    callbacks.on_metadata("malformed, no separator");
    callbacks.on_metadata("A - B - Live");
    barrier(&controller).await;

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].artist, "Some Artist");
    assert_eq!(received[0].title, "Some Title");
    assert_eq!(received[1].title, "B - Live");
}

#[tokio::test]
async fn state_callbacks_drive_the_state_machine() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    controller
        .set_on_state_listener(move |state| {
            sink.lock().unwrap().push(state);
        })
        .unwrap();
    barrier(&controller).await;

    callbacks.on_player_state(4); // PLAYING
    callbacks.on_player_state(42); // unknown, must not dispatch or mutate
    callbacks.on_player_state(3); // PAUSED
    barrier(&controller).await;

    assert_eq!(
        observed.lock().unwrap().as_slice(),
        &[PlayerState::Playing, PlayerState::Paused]
    );
    assert_eq!(
        controller.current_state().await.unwrap(),
        PlayerState::Paused
    );
}

#[tokio::test]
async fn lifecycle_callbacks_reach_their_listeners() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let log = Arc::new(Mutex::new(Vec::new()));
    macro_rules! tag {
        ($name:literal) => {{
            let log = Arc::clone(&log);
            move || log.lock().unwrap().push($name)
        }};
    }
    controller.set_on_ready_listener(tag!("ready")).unwrap();
    controller
        .set_on_prepared_listener(tag!("prepared"))
        .unwrap();
    controller
        .set_on_play_started_listener(tag!("play_started"))
        .unwrap();
    controller
        .set_on_seek_complete_listener(tag!("seek_complete"))
        .unwrap();
    controller
        .set_on_completion_listener(tag!("complete"))
        .unwrap();

    let times = Arc::new(Mutex::new(Vec::new()));
    let time_sink = Arc::clone(&times);
    controller
        .set_on_time_listener(move |ms| time_sink.lock().unwrap().push(ms))
        .unwrap();

    let fills = Arc::new(Mutex::new(Vec::new()));
    let fill_sink = Arc::clone(&fills);
    controller
        .set_on_buffering_update_listener(move |pct| fill_sink.lock().unwrap().push(pct))
        .unwrap();
    barrier(&controller).await;

    callbacks.on_ready();
    callbacks.on_prepared();
    callbacks.on_play_started();
    callbacks.on_time(1000);
    callbacks.on_buffering_update(75);
    callbacks.on_seek_complete();
    callbacks.on_play_complete();
    barrier(&controller).await;

    assert_eq!(
        log.lock().unwrap().as_slice(),
        &["ready", "prepared", "play_started", "seek_complete", "complete"]
    );
    assert_eq!(times.lock().unwrap().as_slice(), &[1000]);
    assert_eq!(fills.lock().unwrap().as_slice(), &[75]);
}

#[tokio::test]
async fn listener_registration_is_last_write_wins() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let first = Arc::new(Mutex::new(0));
    let second = Arc::new(Mutex::new(0));

    let sink = Arc::clone(&first);
    controller
        .set_on_time_listener(move |_| *sink.lock().unwrap() += 1)
        .unwrap();
    let sink = Arc::clone(&second);
    controller
        .set_on_time_listener(move |_| *sink.lock().unwrap() += 1)
        .unwrap();
    barrier(&controller).await;

    callbacks.on_time(500);
    barrier(&controller).await;

    assert_eq!(*first.lock().unwrap(), 0);
    assert_eq!(*second.lock().unwrap(), 1);
}

#[tokio::test]
async fn engine_errors_are_forwarded_with_their_code() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    controller
        .set_on_error_listener(move |code| {
            sink.lock().unwrap().push(code);
            false
        })
        .unwrap();
    barrier(&controller).await;

    callbacks.on_error(PlayerErrorCode::ErrorBuffering.code());
    callbacks.on_error(PlayerErrorCode::NotFound.code());
    barrier(&controller).await;

    assert_eq!(reported.lock().unwrap().as_slice(), &[2, -2]);
}

#[tokio::test]
async fn unrecognized_error_codes_still_reach_the_listener() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);
    controller
        .set_on_error_listener(move |code| {
            sink.lock().unwrap().push(code);
            true
        })
        .unwrap();
    barrier(&controller).await;

    // Outside the known code table; must be forwarded verbatim, not mapped
    // or dropped.
    assert_eq!(PlayerErrorCode::from_code(999), None);
    callbacks.on_error(999);
    barrier(&controller).await;

    assert_eq!(reported.lock().unwrap().as_slice(), &[999]);
}

// ----------------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn release_finalizes_exactly_once() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    controller.release().await.unwrap();
    controller.release().await.unwrap();

    let finalizes = engine
        .commands()
        .iter()
        .filter(|c| c.as_str() == "finalize")
        .count();
    assert_eq!(finalizes, 1);
}

#[tokio::test]
async fn commands_after_release_report_a_released_session() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));

    controller.release().await.unwrap();

    assert!(controller.start().is_err());
    assert!(controller.set_data_source("file:///a.mp3", false).is_err());
    assert!(controller.is_playing().await.is_err());
}

#[tokio::test]
async fn failed_init_leaves_the_session_operational() {
    let engine = Arc::new(RecordingEngine::default());
    engine.fail_init.store(true, Ordering::SeqCst);
    let controller = controller_with(engine.clone(), ScriptedConnectivity::new(None));

    // Commands queued after the failed init still flow to the engine, and
    // teardown still finalizes.
    controller.start().unwrap();
    barrier(&controller).await;
    assert_eq!(engine.commands(), vec!["play"]);

    controller.release().await.unwrap();
    assert!(engine.commands().contains(&"finalize".to_string()));
}

#[tokio::test]
async fn callbacks_after_release_are_discarded() {
    let engine = Arc::new(RecordingEngine::default());
    let controller = controller_with(engine, ScriptedConnectivity::new(None));
    let callbacks = controller.callback_handle();

    controller.release().await.unwrap();

    // Must not panic or deadlock.
    callbacks.on_time(1000);
    callbacks.on_error(-1);
    controller.connectivity_changed();
}
