use serde::{Deserialize, Serialize};

/// Stream played when a caller does not name one.
pub const DEFAULT_STREAM_URI: &str = "https://swahilipotfm.out.airtime.pro/swahilipotfm_a";

/// Configuration of the station and its default stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// URI used by intents that do not carry one.
    pub default_uri: String,
    /// Display name of the station. Also the fallback title of the
    /// mini-player.
    pub station_name: String,
    /// One-line description shown under the station name.
    pub tagline: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            default_uri: DEFAULT_STREAM_URI.to_string(),
            station_name: "Swahilipot FM".to_string(),
            tagline: "Live coastal stories, music, and culture.".to_string(),
        }
    }
}

/// Settings for the network-backed playback device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// `User-Agent` header sent when opening a stream.
    pub user_agent: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("swahilipot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// How the player behaves when another application wants audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionPolicy {
    /// Take exclusive audio focus; other applications are interrupted.
    #[default]
    DoNotMix,
    /// Lower the volume of other applications instead of interrupting them.
    DuckOthers,
    /// Play alongside other applications.
    MixWithOthers,
}

/// Platform audio session settings applied once when the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioModeConfig {
    /// Keep playing when the application is backgrounded.
    pub stays_active_in_background: bool,
    /// Keep playing when the device is in silent mode.
    pub plays_in_silent_mode: bool,
    /// Lower our own volume instead of pausing when interrupted.
    pub should_duck: bool,
    /// Route audio to the earpiece instead of the speaker.
    pub play_through_earpiece: bool,
    pub interruption: InterruptionPolicy,
}

impl Default for AudioModeConfig {
    fn default() -> Self {
        Self {
            stays_active_in_background: true,
            plays_in_silent_mode: true,
            should_duck: true,
            play_through_earpiece: false,
            interruption: InterruptionPolicy::DoNotMix,
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Station and default stream.
    pub stream: StreamConfig,
    /// Playback device settings.
    pub device: DeviceConfig,
    /// Audio session settings.
    pub audio_mode: AudioModeConfig,
}
