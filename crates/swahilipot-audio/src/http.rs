//! Network-backed playback device.
//!
//! [`HttpStreamDevice`] opens a stream with a single `GET` request and pumps
//! the response body on a background task while the handle is playing. It
//! validates that the remote end actually serves audio and meters the bytes
//! received; rendering the decoded audio is left to the platform engine that
//! consumes the stream.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::{sync::watch, task::JoinHandle};

use crate::device::{
    AudioMode, DeviceError, DeviceStatus, LoadError, LoadOptions, PlaybackDevice, PlaybackHandle,
    StatusCallback,
};

/// Content types accepted besides `audio/*`.
const EXTRA_AUDIO_CONTENT_TYPES: [&str; 2] = ["application/ogg", "application/octet-stream"];

/// Checks that a response `Content-Type` describes something playable.
///
/// A missing header is accepted: many Icecast/Shoutcast servers omit it.
pub(crate) fn check_content_type(content_type: Option<&str>) -> Result<(), LoadError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence.starts_with("audio/") || EXTRA_AUDIO_CONTENT_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFormat(content_type.to_string()))
    }
}

/// Playback device streaming resources over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpStreamDevice {
    client: reqwest::Client,
}

impl HttpStreamDevice {
    /// Builds a device whose requests carry the given `User-Agent`.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self { client })
    }

    /// Builds a device on top of an existing, shared client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlaybackDevice for HttpStreamDevice {
    type Handle = HttpStreamHandle;

    async fn create_and_load(
        &self,
        uri: &str,
        options: LoadOptions,
    ) -> Result<Self::Handle, LoadError> {
        log::info!("Opening stream {uri}");
        let response = self.client.get(uri).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        check_content_type(content_type.as_deref())?;

        log::debug!("Stream {uri} answered with content type {content_type:?}");
        Ok(HttpStreamHandle::spawn(uri, response, options.autoplay))
    }

    async fn configure(&self, mode: &AudioMode) -> Result<(), DeviceError> {
        // the stream pump is not tied to an OS audio session, so every mode is
        // satisfied as-is
        log::debug!("Audio mode requested: {mode:?}");
        Ok(())
    }
}

/// State shared between a handle and its pump task.
struct Shared {
    playing: watch::Sender<bool>,
    callbacks: Mutex<Vec<StatusCallback>>,
    received_bytes: AtomicU64,
}

impl Shared {
    fn notify(&self, status: DeviceStatus) {
        let callbacks = match self.callbacks.lock() {
            Ok(callbacks) => callbacks,
            Err(poisoned) => poisoned.into_inner(),
        };
        for callback in callbacks.iter() {
            callback(status);
        }
    }

    /// Marks the stream as silent and reports it if it was playing.
    fn halt(&self) {
        if self.playing.send_replace(false) {
            self.notify(DeviceStatus::PAUSED);
        }
    }
}

/// Handle to one open HTTP stream.
pub struct HttpStreamHandle {
    uri: String,
    shared: Arc<Shared>,
    pump: JoinHandle<()>,
}

impl HttpStreamHandle {
    fn spawn(uri: &str, response: reqwest::Response, autoplay: bool) -> Self {
        let (playing, playing_rx) = watch::channel(autoplay);
        let shared = Arc::new(Shared {
            playing,
            callbacks: Mutex::new(Vec::new()),
            received_bytes: AtomicU64::new(0),
        });
        let pump = tokio::spawn(pump_stream(shared.clone(), response, playing_rx));

        Self {
            uri: uri.to_string(),
            shared,
            pump,
        }
    }

    /// Total bytes read from the stream so far.
    pub fn received_bytes(&self) -> u64 {
        self.shared.received_bytes.load(Ordering::Relaxed)
    }
}

impl Drop for HttpStreamHandle {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[async_trait]
impl PlaybackHandle for HttpStreamHandle {
    async fn pause(&self) -> Result<(), DeviceError> {
        if self.pump.is_finished() {
            return Err(DeviceError::Rejected(format!("stream {} has ended", self.uri)));
        }
        self.shared.halt();
        Ok(())
    }

    async fn stop(&self) -> Result<(), DeviceError> {
        self.pump.abort();
        self.shared.halt();
        Ok(())
    }

    async fn unload(self) -> Result<(), DeviceError> {
        self.pump.abort();
        self.shared.playing.send_replace(false);
        self.shared.notify(DeviceStatus::UNLOADED);
        log::info!(
            "Unloaded stream {} after {} bytes",
            self.uri,
            self.received_bytes()
        );
        Ok(())
    }

    /// Registers `callback` and immediately reports the current status to it,
    /// so a stream that ended before anyone subscribed is still reported.
    fn on_status_change(&self, callback: StatusCallback) {
        let mut callbacks = match self.shared.callbacks.lock() {
            Ok(callbacks) => callbacks,
            Err(poisoned) => poisoned.into_inner(),
        };
        // read under the lock: a concurrent halt either lands before this
        // read or notifies the new callback afterwards
        let current = DeviceStatus {
            loaded: true,
            playing: *self.shared.playing.borrow(),
        };
        callback(current);
        callbacks.push(callback);
    }
}

/// Reads the response body whenever the handle is playing.
async fn pump_stream(
    shared: Arc<Shared>,
    response: reqwest::Response,
    mut playing: watch::Receiver<bool>,
) {
    let mut body = response.bytes_stream();
    loop {
        let resumed = playing.wait_for(|playing| *playing).await.is_ok();
        if !resumed {
            return;
        }

        let next = tokio::select! {
            biased;
            _ = paused(&mut playing) => continue,
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                shared
                    .received_bytes
                    .fetch_add(chunk.len() as u64, Ordering::Relaxed);
            }
            Some(Err(err)) => {
                log::warn!("Stream interrupted: {err}");
                shared.halt();
                return;
            }
            None => {
                log::info!("Stream ended by the remote end");
                shared.halt();
                return;
            }
        }
    }
}

/// Resolves once the handle stops playing.
async fn paused(playing: &mut watch::Receiver<bool>) {
    let _ = playing.wait_for(|playing| !*playing).await;
}
