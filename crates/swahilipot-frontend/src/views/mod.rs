mod floating_player;
mod fm_screen;

pub use floating_player::FloatingPlayer;
pub use fm_screen::FmScreen;

use swahilipot_bridge::{
    MessageToBackend,
    session::{PlaybackPhase, SessionState},
};

use crate::entities::DataEntities;

/// Buttons a surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Toggle,
    Stop,
}

/// Icon drawn on a control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlIcon {
    Play,
    Pause,
    Stop,
}

impl ControlIcon {
    /// Icon of the play/pause button for `state`.
    pub fn for_toggle(state: &SessionState) -> Self {
        if state.is_playing() {
            ControlIcon::Pause
        } else {
            ControlIcon::Play
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ControlIcon::Play => "▶",
            ControlIcon::Pause => "⏸",
            ControlIcon::Stop => "■",
        }
    }
}

/// A surface rendering the shared session and turning presses into intents.
pub trait PlayerSurface {
    /// Intent sent to the backend when `control` is pressed.
    fn press(&self, control: Control) -> MessageToBackend;

    /// Text rendering of the surface for the current state.
    fn render(&self) -> String;
}

/// Suffix shown while a stream is being opened.
pub(crate) fn loading_suffix(state: &SessionState) -> &'static str {
    if state.phase() == PlaybackPhase::Loading {
        " (loading...)"
    } else {
        ""
    }
}

/// Top-level layout: the FM tab with the mini-player floating under it.
pub struct FrontendUi {
    pub fm_screen: FmScreen,
    pub floating_player: FloatingPlayer,
}

impl FrontendUi {
    pub fn new(data: &DataEntities) -> Self {
        Self {
            fm_screen: FmScreen::new(data),
            floating_player: FloatingPlayer::new(data),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}\n{}",
            self.fm_screen.render(),
            self.floating_player.render()
        )
    }
}
