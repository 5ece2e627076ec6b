//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the player
//! surfaces (the FM tab screen and the floating mini-player) with an
//! asynchronous backend that owns the playback session.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The frontend sends intents (play, pause, stop, toggle) and requests
//!   (session snapshot, configuration).
//! - The backend pushes every session change and responses to requests.
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod config;
pub mod session;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// The playback session changed. Carries the full state, not a delta.
    SessionUpdate(session::SessionState),
    /// Response to the configuration request from the frontend.
    ConfigurationResponse(config::Config),
}

/// Intents and requests issued by the frontend to the backend.
///
/// `uri` and `title` are optional everywhere; a missing `uri` resolves to the
/// configured default stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageToBackend {
    /// Start playing `uri`, replacing whatever is loaded.
    Play {
        uri: Option<String>,
        title: Option<String>,
    },
    /// Pause the loaded stream without unloading it.
    Pause,
    /// Stop and unload the loaded stream.
    Stop,
    /// Play when idle or switching streams, pause when already playing.
    Toggle {
        uri: Option<String>,
        title: Option<String>,
    },
    /// Request for the current session state.
    SessionRequest,
    /// Request for the application configuration.
    ConfigurationRequest,
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
