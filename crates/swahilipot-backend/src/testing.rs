//! In-memory playback device used by the backend tests.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use swahilipot_audio::{
    AudioMode, DeviceError, DeviceStatus, LoadError, LoadOptions, PlaybackDevice, PlaybackHandle,
    StatusCallback,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Configure,
    Load(String, bool),
    Pause(String),
    Stop(String),
    Unload(String),
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<DeviceCall>>,
    failing_loads: Mutex<HashSet<String>>,
    failing_controls: AtomicBool,
    hold: Mutex<Option<Arc<Notify>>>,
    callbacks: Mutex<Vec<(String, StatusCallback)>>,
    loaded: AtomicUsize,
    max_loaded: AtomicUsize,
}

/// Records every call and keeps count of loaded handles.
#[derive(Clone, Default)]
pub struct MockDevice {
    state: Arc<MockState>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, DeviceCall::Load(..)))
            .count()
    }

    /// Number of handles currently loaded.
    pub fn loaded(&self) -> usize {
        self.state.loaded.load(Ordering::SeqCst)
    }

    /// Highest number of handles that were ever loaded at the same time.
    pub fn max_loaded(&self) -> usize {
        self.state.max_loaded.load(Ordering::SeqCst)
    }

    pub fn fail_load(&self, uri: &str) {
        self.state
            .failing_loads
            .lock()
            .unwrap()
            .insert(uri.to_string());
    }

    /// Makes configure, pause, stop and unload report errors.
    pub fn fail_controls(&self) {
        self.state.failing_controls.store(true, Ordering::SeqCst);
    }

    /// Makes every load wait for a notification on the returned handle.
    pub fn hold_loads(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.state.hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Delivers `status` to every handle ever loaded for `uri`.
    pub fn emit(&self, uri: &str, status: DeviceStatus) {
        let callbacks = self.state.callbacks.lock().unwrap();
        for (_, callback) in callbacks.iter().filter(|(target, _)| target == uri) {
            callback(status);
        }
    }

    fn record(&self, call: DeviceCall) {
        self.state.calls.lock().unwrap().push(call);
    }

    fn control_result(&self) -> Result<(), DeviceError> {
        if self.state.failing_controls.load(Ordering::SeqCst) {
            Err(DeviceError::Rejected("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlaybackDevice for MockDevice {
    type Handle = MockHandle;

    async fn create_and_load(
        &self,
        uri: &str,
        options: LoadOptions,
    ) -> Result<Self::Handle, LoadError> {
        self.record(DeviceCall::Load(uri.to_string(), options.autoplay));

        let hold = self.state.hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }

        if self.state.failing_loads.lock().unwrap().contains(uri) {
            return Err(LoadError::Unavailable(format!("{uri} is offline")));
        }

        let loaded = self.state.loaded.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_loaded.fetch_max(loaded, Ordering::SeqCst);
        Ok(MockHandle {
            uri: uri.to_string(),
            device: self.clone(),
        })
    }

    async fn configure(&self, _mode: &AudioMode) -> Result<(), DeviceError> {
        self.record(DeviceCall::Configure);
        self.control_result()
    }
}

pub struct MockHandle {
    uri: String,
    device: MockDevice,
}

#[async_trait]
impl PlaybackHandle for MockHandle {
    async fn pause(&self) -> Result<(), DeviceError> {
        self.device.record(DeviceCall::Pause(self.uri.clone()));
        self.device.control_result()
    }

    async fn stop(&self) -> Result<(), DeviceError> {
        self.device.record(DeviceCall::Stop(self.uri.clone()));
        self.device.control_result()
    }

    async fn unload(self) -> Result<(), DeviceError> {
        self.device.record(DeviceCall::Unload(self.uri.clone()));
        self.device.state.loaded.fetch_sub(1, Ordering::SeqCst);
        self.device.control_result()
    }

    fn on_status_change(&self, callback: StatusCallback) {
        self.device
            .state
            .callbacks
            .lock()
            .unwrap()
            .push((self.uri.clone(), callback));
    }
}
