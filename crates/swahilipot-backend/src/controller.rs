//! Single-stream playback session.
//!
//! [`SessionController`] owns the one device handle that may exist at any
//! time and the [`SessionState`] every player surface renders. Intents
//! (play, pause, stop, toggle) never fail from the caller's point of view:
//! device errors are logged here and folded into the published state.
//!
//! Device-mutating steps are serialized by the mutex around the handle slot.
//! The published state sits in a `watch` channel next to it, so readers never
//! wait for an in-flight load.

use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering},
};

use swahilipot_audio::{AudioMode, DeviceStatus, LoadOptions, PlaybackDevice, PlaybackHandle};
use swahilipot_bridge::session::SessionState;
use tokio::sync::{Mutex, watch};

/// The resource currently loaded on the device.
struct Loaded<H> {
    uri: String,
    handle: H,
}

/// Published session state and the generation of the handle allowed to
/// report into it.
///
/// The generation only changes inside `send_modify` closures so a status
/// report can never interleave with a handle swap.
struct Published {
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl Published {
    /// Applies a status report from the handle of `generation`.
    fn ingest(&self, generation: u64, status: DeviceStatus) {
        if !status.loaded {
            log::debug!("Ignoring status {status:?}, resource is not loaded");
            return;
        }

        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::Acquire) != generation {
                log::debug!("Ignoring status {status:?} from superseded handle #{generation}");
                return false;
            }

            let playing = status.playing && state.active_uri.is_some();
            if state.playing == playing {
                return false;
            }
            log::info!("Device reports playing={playing}");
            state.playing = playing;
            true
        });
    }

    /// Marks the loaded resource as gone. Reports from older handles are
    /// ignored from now on.
    fn retire(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            state.active_uri = None;
            state.playing = false;
        });
    }
}

/// Owner of the playback session.
pub struct SessionController<D: PlaybackDevice> {
    device: D,
    default_uri: String,
    slot: Mutex<Option<Loaded<D::Handle>>>,
    published: Arc<Published>,
}

impl<D: PlaybackDevice> SessionController<D> {
    /// Creates an idle controller. Intents without a URI play `default_uri`.
    pub fn new(device: D, default_uri: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            device,
            default_uri: default_uri.into(),
            slot: Mutex::new(None),
            published: Arc::new(Published {
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn default_uri(&self) -> &str {
        &self.default_uri
    }

    /// Applies platform audio session settings. Best-effort.
    pub async fn configure_audio_mode(&self, mode: &AudioMode) {
        if let Err(err) = self.device.configure(mode).await {
            log::warn!("Failed to configure audio mode: {err}");
        }
    }

    /// Subscribes to every later change of the session state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.published.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.published.state.borrow().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.published.state.borrow().playing
    }

    pub fn title(&self) -> Option<String> {
        self.published.state.borrow().title.clone()
    }

    /// Feeds a status report of the current handle into the session.
    ///
    /// Used by device adapters that deliver events outside of the handle
    /// callback.
    pub fn on_device_status(&self, status: DeviceStatus) {
        let generation = self.published.generation.load(Ordering::Acquire);
        self.published.ingest(generation, status);
    }

    /// Plays `uri`, or the default stream. A no-op when that stream is
    /// already playing.
    pub async fn play(&self, uri: Option<&str>, title: Option<&str>) {
        let target = self.resolve(uri);
        let mut slot = self.slot.lock().await;
        self.play_locked(&mut slot, target, title).await;
    }

    /// Pauses the loaded stream, keeping it loaded.
    pub async fn pause(&self) {
        let slot = self.slot.lock().await;
        self.pause_locked(&slot).await;
    }

    /// Stops and unloads the loaded stream. The session is always empty
    /// afterwards.
    pub async fn stop(&self) {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some(loaded) => self.release(loaded, true).await,
            None => log::debug!("Stop requested with nothing loaded"),
        }

        self.published.state.send_if_modified(|state| {
            let changed = *state != SessionState::default();
            *state = SessionState::default();
            changed
        });
    }

    /// Plays `uri` (or the default stream) unless it is the one playing, in
    /// which case it is paused.
    pub async fn toggle(&self, uri: Option<&str>, title: Option<&str>) {
        let target = self.resolve(uri);
        let mut slot = self.slot.lock().await;

        let playing_target = self.published.state.borrow().is_playing_uri(&target);
        if playing_target {
            self.pause_locked(&slot).await;
        } else {
            self.play_locked(&mut slot, target, title).await;
        }
    }

    /// Releases the device handle, if any, and empties the session.
    pub async fn dispose(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(loaded) = slot.take() {
            log::info!("Releasing {} on shutdown", loaded.uri);
            self.release(loaded, false).await;
        }
        self.published.state.send_replace(SessionState::default());
    }

    fn resolve(&self, uri: Option<&str>) -> String {
        uri.unwrap_or(&self.default_uri).to_string()
    }

    async fn play_locked(
        &self,
        slot: &mut Option<Loaded<D::Handle>>,
        target: String,
        title: Option<&str>,
    ) {
        let already_playing = self.published.state.borrow().is_playing_uri(&target);
        if already_playing {
            log::debug!("Already playing {target}");
            return;
        }

        self.published
            .state
            .send_modify(|state| state.loading_uri = Some(target.clone()));

        if let Some(previous) = slot.take() {
            self.release(previous, false).await;
        }

        let options = LoadOptions { autoplay: true };
        match self.device.create_and_load(&target, options).await {
            Ok(handle) => {
                let mut generation = 0;
                self.published.state.send_modify(|state| {
                    generation = self.published.generation.fetch_add(1, Ordering::AcqRel) + 1;
                    state.active_uri = Some(target.clone());
                    state.playing = true;
                    state.loading_uri = None;
                    if let Some(title) = title {
                        state.title = Some(title.to_string());
                    }
                });

                let published: Weak<Published> = Arc::downgrade(&self.published);
                handle.on_status_change(Box::new(move |status| {
                    if let Some(published) = published.upgrade() {
                        published.ingest(generation, status);
                    }
                }));

                log::info!("Playing {target}");
                *slot = Some(Loaded {
                    uri: target,
                    handle,
                });
            }
            Err(err) => {
                log::warn!("Failed to load {target}: {err}");
                self.published.state.send_replace(SessionState::default());
            }
        }
    }

    async fn pause_locked(&self, slot: &Option<Loaded<D::Handle>>) {
        let Some(loaded) = slot.as_ref() else {
            log::debug!("Pause requested with nothing loaded");
            return;
        };

        if let Err(err) = loaded.handle.pause().await {
            log::warn!("Failed to pause {}: {err}", loaded.uri);
        }

        self.published.state.send_if_modified(|state| {
            let changed = state.playing;
            state.playing = false;
            changed
        });
    }

    /// Unloads `loaded`, optionally stopping it first. Errors are logged and
    /// the handle is gone either way.
    async fn release(&self, loaded: Loaded<D::Handle>, stop_first: bool) {
        self.published.retire();

        let Loaded { uri, handle } = loaded;
        if stop_first {
            if let Err(err) = handle.stop().await {
                log::warn!("Failed to stop {uri}: {err}");
            }
        }
        if let Err(err) = handle.unload().await {
            log::warn!("Failed to unload {uri}: {err}");
        }
    }
}

impl<D: PlaybackDevice> Drop for SessionController<D> {
    fn drop(&mut self) {
        let Some(Loaded { uri, handle }) = self.slot.get_mut().take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(err) = handle.unload().await {
                        log::warn!("Failed to unload {uri}: {err}");
                    }
                });
            }
            Err(_) => log::warn!("No runtime left to unload {uri}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use swahilipot_bridge::session::PlaybackPhase;

    use super::*;
    use crate::testing::{DeviceCall, MockDevice};

    const DEFAULT_URI: &str = "https://radio.example/default";
    const URI_A: &str = "https://radio.example/a";
    const URI_B: &str = "https://radio.example/b";

    fn controller() -> (SessionController<MockDevice>, MockDevice) {
        let device = MockDevice::new();
        (SessionController::new(device.clone(), DEFAULT_URI), device)
    }

    fn assert_consistent(state: &SessionState) {
        assert!(
            !state.playing || state.active_uri.is_some(),
            "playing without an active resource: {state:?}"
        );
    }

    #[tokio::test]
    async fn play_without_arguments_loads_default_stream() {
        let (controller, device) = controller();

        controller.play(None, None).await;

        assert_eq!(device.calls(), vec![DeviceCall::Load(DEFAULT_URI.into(), true)]);
        assert!(controller.is_playing());
        assert_eq!(controller.title(), None);
        assert_eq!(controller.snapshot().active_uri.as_deref(), Some(DEFAULT_URI));
        assert_eq!(controller.snapshot().phase(), PlaybackPhase::Playing);
    }

    #[tokio::test]
    async fn play_same_stream_twice_loads_once() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), Some("T")).await;
        let first = controller.snapshot();
        controller.play(Some(URI_A), Some("T")).await;

        assert_eq!(device.load_count(), 1);
        assert_eq!(controller.snapshot(), first);
    }

    #[tokio::test]
    async fn switching_streams_unloads_previous_before_loading_next() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), Some("Show A")).await;
        controller.play(Some(URI_B), Some("Show B")).await;

        assert_eq!(
            device.calls(),
            vec![
                DeviceCall::Load(URI_A.into(), true),
                DeviceCall::Unload(URI_A.into()),
                DeviceCall::Load(URI_B.into(), true),
            ]
        );
        assert_eq!(device.max_loaded(), 1);
        assert_eq!(controller.title().as_deref(), Some("Show B"));
        assert_eq!(controller.snapshot().active_uri.as_deref(), Some(URI_B));
    }

    #[tokio::test]
    async fn play_without_title_keeps_previous_title() {
        let (controller, _device) = controller();

        controller.play(Some(URI_A), Some("Show A")).await;
        controller.pause().await;
        controller.play(Some(URI_A), None).await;

        assert!(controller.is_playing());
        assert_eq!(controller.title().as_deref(), Some("Show A"));
    }

    #[tokio::test]
    async fn failed_load_leaves_session_idle() {
        let (controller, device) = controller();
        device.fail_load(URI_B);

        controller.play(Some(URI_A), Some("Show A")).await;
        controller.play(Some(URI_B), Some("Show B")).await;

        let state = controller.snapshot();
        assert_eq!(state, SessionState::default());
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert_eq!(device.loaded(), 0);
    }

    #[tokio::test]
    async fn toggle_twice_pauses_without_unloading() {
        let (controller, device) = controller();

        controller.toggle(Some(URI_A), None).await;
        assert!(controller.is_playing());
        controller.toggle(Some(URI_A), None).await;

        let state = controller.snapshot();
        assert!(!state.playing);
        assert_eq!(state.active_uri.as_deref(), Some(URI_A));
        assert_eq!(state.phase(), PlaybackPhase::Paused);
        assert_eq!(
            device.calls(),
            vec![
                DeviceCall::Load(URI_A.into(), true),
                DeviceCall::Pause(URI_A.into()),
            ]
        );
    }

    #[tokio::test]
    async fn toggle_to_other_stream_switches() {
        let (controller, device) = controller();

        controller.toggle(None, Some("Swahilipot FM")).await;
        controller.toggle(Some(URI_B), Some("Show B")).await;

        assert!(controller.is_playing());
        assert_eq!(controller.snapshot().active_uri.as_deref(), Some(URI_B));
        assert_eq!(device.max_loaded(), 1);
    }

    #[tokio::test]
    async fn toggle_from_paused_resumes_by_reloading() {
        let (controller, device) = controller();

        controller.toggle(Some(URI_A), None).await;
        controller.toggle(Some(URI_A), None).await;
        controller.toggle(Some(URI_A), None).await;

        assert!(controller.is_playing());
        assert_eq!(device.load_count(), 2);
        assert_eq!(device.loaded(), 1);
    }

    #[tokio::test]
    async fn stop_clears_session_even_when_device_fails() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), Some("Show A")).await;
        device.fail_controls();
        controller.stop().await;

        assert_eq!(controller.snapshot(), SessionState::default());
        assert_eq!(
            device.calls(),
            vec![
                DeviceCall::Load(URI_A.into(), true),
                DeviceCall::Stop(URI_A.into()),
                DeviceCall::Unload(URI_A.into()),
            ]
        );
    }

    #[tokio::test]
    async fn pause_and_stop_without_stream_are_noops() {
        let (controller, device) = controller();

        controller.pause().await;
        controller.stop().await;

        assert!(device.calls().is_empty());
        assert_eq!(controller.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn failed_pause_still_reports_paused() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), Some("Show A")).await;
        device.fail_controls();
        controller.pause().await;

        let state = controller.snapshot();
        assert!(!state.playing);
        assert_eq!(state.active_uri.as_deref(), Some(URI_A));
        assert_eq!(state.title(), Some("Show A"));
    }

    #[tokio::test]
    async fn device_interruption_flips_playing() {
        let (controller, device) = controller();
        let mut updates = controller.subscribe();

        controller.play(Some(URI_A), None).await;
        updates.borrow_and_update();

        device.emit(URI_A, DeviceStatus::PAUSED);
        assert!(updates.has_changed().unwrap());
        assert!(!controller.is_playing());
        assert_eq!(controller.snapshot().active_uri.as_deref(), Some(URI_A));

        device.emit(URI_A, DeviceStatus::PLAYING);
        assert!(controller.is_playing());
    }

    #[tokio::test]
    async fn unloaded_status_is_ignored() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), None).await;
        device.emit(URI_A, DeviceStatus::UNLOADED);

        assert!(controller.is_playing());
    }

    #[tokio::test]
    async fn superseded_handle_cannot_change_state() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), None).await;
        controller.play(Some(URI_B), None).await;
        device.emit(URI_A, DeviceStatus::PAUSED);

        assert!(controller.is_playing());
        assert_eq!(controller.snapshot().active_uri.as_deref(), Some(URI_B));
    }

    #[tokio::test]
    async fn status_ingestion_never_plays_an_empty_session() {
        let (controller, _device) = controller();

        controller.on_device_status(DeviceStatus::PLAYING);

        assert_consistent(&controller.snapshot());
        assert!(!controller.is_playing());
    }

    #[tokio::test]
    async fn concurrent_plays_of_one_stream_load_once() {
        let (controller, device) = controller();
        let release = device.hold_loads();
        let mut updates = controller.subscribe();

        let observe = async {
            updates
                .wait_for(|state| state.phase() == PlaybackPhase::Loading)
                .await
                .unwrap();
            assert!(!controller.is_playing());
            release.notify_one();
        };
        tokio::join!(
            controller.play(Some(URI_A), None),
            controller.play(Some(URI_A), None),
            observe,
        );

        assert_eq!(device.load_count(), 1);
        assert!(controller.is_playing());
    }

    #[tokio::test]
    async fn toggle_issued_during_load_sees_fresh_state() {
        let (controller, device) = controller();
        let release = device.hold_loads();

        let release_later = async {
            tokio::task::yield_now().await;
            release.notify_one();
        };
        tokio::join!(
            controller.play(Some(URI_A), Some("Show A")),
            controller.toggle(Some(URI_A), None),
            release_later,
        );

        let state = controller.snapshot();
        assert_consistent(&state);
        assert_eq!(device.load_count(), 1);
        assert_eq!(state.phase(), PlaybackPhase::Paused);
        assert_eq!(state.title(), Some("Show A"));
    }

    #[tokio::test]
    async fn invariants_hold_across_a_session() {
        let (controller, device) = controller();
        let mut updates = controller.subscribe();
        device.fail_load(URI_B);

        controller.toggle(None, Some("Swahilipot FM")).await;
        assert_consistent(&updates.borrow_and_update());
        controller.play(Some(URI_A), Some("Show A")).await;
        assert_consistent(&updates.borrow_and_update());
        device.emit(URI_A, DeviceStatus::PAUSED);
        assert_consistent(&updates.borrow_and_update());
        controller.play(Some(URI_B), Some("Show B")).await;
        assert_consistent(&updates.borrow_and_update());
        controller.toggle(Some(URI_A), None).await;
        assert_consistent(&updates.borrow_and_update());
        controller.stop().await;
        assert_consistent(&updates.borrow_and_update());

        assert!(device.max_loaded() <= 1);
        assert_eq!(device.loaded(), 0);
    }

    #[tokio::test]
    async fn dispose_unloads_current_stream() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), None).await;
        controller.dispose().await;

        assert_eq!(device.loaded(), 0);
        assert_eq!(controller.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn drop_hands_stream_to_runtime_for_unloading() {
        let (controller, device) = controller();

        controller.play(Some(URI_A), None).await;
        drop(controller);

        for _ in 0..10 {
            if device.loaded() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(device.loaded(), 0);
        assert!(device.calls().contains(&DeviceCall::Unload(URI_A.into())));
    }

    #[tokio::test]
    async fn audio_mode_failure_is_swallowed() {
        let (controller, device) = controller();
        device.fail_controls();

        controller.configure_audio_mode(&AudioMode::default()).await;

        assert_eq!(device.calls(), vec![DeviceCall::Configure]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stream_ending_during_load_leaves_session_paused() {
        use std::time::Duration;

        use swahilipot_audio::HttpStreamDevice;
        use tokio::{
            io::{AsyncReadExt, AsyncWriteExt},
            net::TcpListener,
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let uri = format!("http://{}/live", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: 4\r\n\r\nabcd",
                )
                .await
                .unwrap();
            socket.shutdown().await.ok();
        });
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let controller = SessionController::new(HttpStreamDevice::with_client(client), uri.clone());

        controller.play(None, None).await;

        let mut session = controller.subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            session.wait_for(|state| !state.playing),
        )
        .await
        .expect("the ended stream was never reported")
        .unwrap();
        let state = controller.snapshot();
        assert_eq!(state.active_uri.as_deref(), Some(uri.as_str()));
        assert_eq!(state.phase(), PlaybackPhase::Paused);
    }
}
