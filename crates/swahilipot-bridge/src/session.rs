use serde::{Deserialize, Serialize};

/// Coarse playback phase derived from a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Nothing is loaded on the device.
    Idle,
    /// A load is in flight.
    Loading,
    /// The active stream is producing audio.
    Playing,
    /// The active stream is loaded but silent.
    Paused,
}

/// The single logical "what is currently loaded/playing" state.
///
/// Published by the backend's session controller and mirrored by every
/// frontend surface. `playing` is never `true` while `active_uri` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// URI of the resource currently loaded on the device.
    pub active_uri: Option<String>,
    /// Whether the device is producing audio for `active_uri`.
    pub playing: bool,
    /// Label chosen by whoever started playback.
    pub title: Option<String>,
    /// Target of a load that has not settled yet.
    pub loading_uri: Option<String>,
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns `true` when `uri` is the active resource and it is playing.
    pub fn is_playing_uri(&self, uri: &str) -> bool {
        self.playing && self.active_uri.as_deref() == Some(uri)
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.loading_uri.is_some() {
            PlaybackPhase::Loading
        } else if self.active_uri.is_none() {
            PlaybackPhase::Idle
        } else if self.playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }
}
