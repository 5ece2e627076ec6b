use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use swahilipot_audio::{AudioMode, Interruption};
use swahilipot_bridge::config::{AudioModeConfig, Config, InterruptionPolicy};
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Errors that can occur while loading or resolving application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the configuration to TOML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn config_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("org", "swahilipot", "swahilipot-radio") {
        Some(path) => Ok(path.config_dir().join("config.toml")),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads the application configuration from the user's configuration
/// directory, writing the defaults there on first run.
pub async fn load_config() -> Result<Config, ConfigError> {
    let config_path = config_path()?;
    log::info!("Loading configuration from {config_path:?}");
    load_config_from(&config_path).await
}

pub(crate) async fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let contents = read_to_string(config_path).await?;
        return Ok(toml::from_str(&contents)?);
    }

    let config = Config::default();
    save_config_to(&config, config_path).await?;
    Ok(config)
}

/// Serializes `config` to pretty-printed TOML at `config_path`, overwriting
/// any existing file.
pub(crate) async fn save_config_to(config: &Config, config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent).await?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(config_path)
        .await?;

    let contents = toml::to_string_pretty(config)?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(())
}

/// Translates the persisted audio mode into the device's settings.
pub(crate) fn audio_mode(config: &AudioModeConfig) -> AudioMode {
    AudioMode {
        stays_active_in_background: config.stays_active_in_background,
        plays_in_silent_mode: config.plays_in_silent_mode,
        should_duck: config.should_duck,
        play_through_earpiece: config.play_through_earpiece,
        interruption: match config.interruption {
            InterruptionPolicy::DoNotMix => Interruption::DoNotMix,
            InterruptionPolicy::DuckOthers => Interruption::DuckOthers,
            InterruptionPolicy::MixWithOthers => Interruption::MixWithOthers,
        },
    }
}
