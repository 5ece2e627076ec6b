//! Playback device capability and stream-backed device adapters.
//!
//! The session controller never talks to an audio engine directly. It goes
//! through the small capability defined in [`device`]:
//! - [`PlaybackDevice::create_and_load`] opens a resource by URI and hands
//!   back a handle.
//! - A [`PlaybackHandle`] can be paused, stopped and unloaded, and reports
//!   status changes through a callback.
//!
//! [`http::HttpStreamDevice`] implements the capability on top of an HTTP
//! client for internet radio streams.

pub mod device;
pub mod http;

pub use device::{
    AudioMode, DeviceError, DeviceStatus, Interruption, LoadError, LoadOptions, PlaybackDevice,
    PlaybackHandle, StatusCallback,
};
pub use http::HttpStreamDevice;
