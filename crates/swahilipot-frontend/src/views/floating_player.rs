use swahilipot_bridge::MessageToBackend;

use crate::entities::{
    DataEntities, session_entity::SessionEntity, settings_entity::SettingsEntity,
};
use crate::views::{Control, ControlIcon, PlayerSurface, loading_suffix};

/// The mini-player floating over every tab.
pub struct FloatingPlayer {
    session: SessionEntity,
    settings: SettingsEntity,
}

impl FloatingPlayer {
    pub fn new(data: &DataEntities) -> Self {
        Self {
            session: data.session.clone(),
            settings: data.settings.clone(),
        }
    }

    pub fn toggle_icon(&self) -> ControlIcon {
        ControlIcon::for_toggle(&self.session.current())
    }

    /// Session title, or the station name when nobody set one.
    pub fn title(&self) -> String {
        self.session
            .current()
            .title
            .unwrap_or_else(|| self.settings.stream().station_name)
    }
}

impl PlayerSurface for FloatingPlayer {
    fn press(&self, control: Control) -> MessageToBackend {
        match control {
            Control::Toggle => MessageToBackend::Toggle {
                uri: None,
                title: None,
            },
            Control::Stop => MessageToBackend::Stop,
        }
    }

    fn render(&self) -> String {
        format!(
            "[mini] {}{} [{}] [{}]",
            self.title(),
            loading_suffix(&self.session.current()),
            self.toggle_icon().glyph(),
            ControlIcon::Stop.glyph(),
        )
    }
}
