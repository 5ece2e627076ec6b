//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and the session controller, and
//! provides helpers for sending session updates and responses back to the
//! frontend bridge.

use std::sync::Arc;

use swahilipot_audio::PlaybackDevice;
use swahilipot_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::controller::SessionController;
use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext<D: PlaybackDevice> {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// The one playback session of the application.
    pub controller: SessionController<D>,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl<D: PlaybackDevice> AppContext<D> {
    /// Read and dispatch messages from the frontend bridge until it closes.
    ///
    /// Messages are handled one at a time and in order; the channel keeps
    /// accepting intents while a device call is in flight.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::info!("Frontend bridge closed");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::Play { uri, title } => {
                services::playback_service::handle_play_request(self.clone(), uri, title).await;
            }
            MessageToBackend::Pause => {
                services::playback_service::handle_pause_request(self.clone()).await;
            }
            MessageToBackend::Stop => {
                services::playback_service::handle_stop_request(self.clone()).await;
            }
            MessageToBackend::Toggle { uri, title } => {
                services::playback_service::handle_toggle_request(self.clone(), uri, title).await;
            }
            MessageToBackend::SessionRequest => {
                services::playback_service::handle_session_request(self.clone()).await;
            }
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
        }
    }

    /// Send a message to the frontend bridge. Messages are dropped once the
    /// frontend has gone away.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(err) = self.tx.send(message).await {
            log::debug!("Frontend is gone, dropping {:?}", err.0);
        }
    }
}
