use swahilipot_bridge::MessageToBackend;

use crate::entities::{
    DataEntities, session_entity::SessionEntity, settings_entity::SettingsEntity,
};
use crate::views::{Control, ControlIcon, PlayerSurface, loading_suffix};

/// The FM tab: station heading, tagline and the "Now Playing" card.
///
/// Its play/pause button always targets the default stream and labels the
/// session with the station name.
pub struct FmScreen {
    session: SessionEntity,
    settings: SettingsEntity,
}

impl FmScreen {
    pub fn new(data: &DataEntities) -> Self {
        Self {
            session: data.session.clone(),
            settings: data.settings.clone(),
        }
    }

    pub fn toggle_icon(&self) -> ControlIcon {
        ControlIcon::for_toggle(&self.session.current())
    }

    /// Status line of the "Now Playing" card.
    pub fn status_line(&self) -> String {
        if self.session.current().is_playing() {
            format!("Live: {}", self.settings.stream().station_name)
        } else {
            "Stopped".to_string()
        }
    }
}

impl PlayerSurface for FmScreen {
    fn press(&self, control: Control) -> MessageToBackend {
        match control {
            Control::Toggle => MessageToBackend::Toggle {
                uri: None,
                title: Some(self.settings.stream().station_name),
            },
            Control::Stop => MessageToBackend::Stop,
        }
    }

    fn render(&self) -> String {
        let stream = self.settings.stream();
        let state = self.session.current();
        format!(
            "== {} ==\n{}\nNow Playing: [{}] [{}] {}{}",
            stream.station_name,
            stream.tagline,
            self.toggle_icon().glyph(),
            ControlIcon::Stop.glyph(),
            self.status_line(),
            loading_suffix(&state),
        )
    }
}
