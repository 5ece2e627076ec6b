use std::sync::Arc;

use swahilipot_bridge::config::{Config, StreamConfig};
use tokio::sync::watch;

/// Configuration as last reported by the backend.
#[derive(Debug, Clone)]
pub struct SettingsEntity {
    config: Arc<watch::Sender<Config>>,
}

impl Default for SettingsEntity {
    fn default() -> Self {
        let (config, _) = watch::channel(Config::default());
        Self {
            config: Arc::new(config),
        }
    }
}

impl SettingsEntity {
    pub fn update(&self, config: Config) {
        self.config.send_replace(config);
    }

    pub fn stream(&self) -> StreamConfig {
        self.config.borrow().stream.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Config> {
        self.config.subscribe()
    }
}
