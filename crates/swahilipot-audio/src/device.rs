use async_trait::async_trait;

/// Errors that can occur while resolving and opening a resource.
///
/// A load error means nothing was loaded and no handle exists.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The request for the resource could not be completed (DNS, connection,
    /// TLS, or a malformed URI).
    #[error("failed to request stream: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status code.
    #[error("stream responded with status {0}")]
    Status(u16),
    /// The resource is reachable but does not carry audio.
    #[error("unsupported stream format: {0}")]
    UnsupportedFormat(String),
    /// The device refused to open the resource for a reason of its own.
    #[error("stream is unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a control operation on an already loaded resource.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The handle was already released by the device.
    #[error("no resource is loaded")]
    NotLoaded,
    /// The device rejected the operation.
    #[error("device rejected the operation: {0}")]
    Rejected(String),
}

/// Status reported by a loaded handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Whether the resource is still loaded.
    pub loaded: bool,
    /// Whether the resource is producing audio.
    pub playing: bool,
}

impl DeviceStatus {
    pub const PLAYING: Self = Self {
        loaded: true,
        playing: true,
    };
    pub const PAUSED: Self = Self {
        loaded: true,
        playing: false,
    };
    pub const UNLOADED: Self = Self {
        loaded: false,
        playing: false,
    };
}

/// Options applied when a resource is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Start producing audio as soon as the resource is open.
    pub autoplay: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

/// Interruption handling requested from the platform audio session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interruption {
    #[default]
    DoNotMix,
    DuckOthers,
    MixWithOthers,
}

/// Platform audio session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    pub stays_active_in_background: bool,
    pub plays_in_silent_mode: bool,
    pub should_duck: bool,
    pub play_through_earpiece: bool,
    pub interruption: Interruption,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            stays_active_in_background: true,
            plays_in_silent_mode: true,
            should_duck: true,
            play_through_earpiece: false,
            interruption: Interruption::DoNotMix,
        }
    }
}

/// Callback invoked by a handle whenever its status changes.
///
/// Callbacks may run on any thread and must not block.
pub type StatusCallback = Box<dyn Fn(DeviceStatus) + Send + Sync + 'static>;

/// An audio engine able to load resources by URI.
#[async_trait]
pub trait PlaybackDevice: Send + Sync + 'static {
    /// Handle to one loaded resource.
    type Handle: PlaybackHandle;

    /// Opens `uri` and returns a handle to it. With `options.autoplay` the
    /// resource starts playing before this returns.
    async fn create_and_load(
        &self,
        uri: &str,
        options: LoadOptions,
    ) -> Result<Self::Handle, LoadError>;

    /// Applies platform audio session settings. Devices without such a
    /// session accept any mode.
    async fn configure(&self, _mode: &AudioMode) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// A loaded, playable resource.
///
/// Dropping a handle without calling [`PlaybackHandle::unload`] may leak the
/// underlying device resource.
#[async_trait]
pub trait PlaybackHandle: Send + Sync + 'static {
    async fn pause(&self) -> Result<(), DeviceError>;

    async fn stop(&self) -> Result<(), DeviceError>;

    /// Releases the resource. The handle is gone afterwards even when the
    /// device reports an error.
    async fn unload(self) -> Result<(), DeviceError>;

    /// Registers `callback` to receive every later status change.
    fn on_status_change(&self, callback: StatusCallback);
}
