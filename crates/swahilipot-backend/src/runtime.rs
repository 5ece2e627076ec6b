//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, the playback device, the
//! session controller and the message dispatch loop that listens to
//! frontend bridge requests.

use std::{sync::Arc, thread};

use swahilipot_audio::{HttpStreamDevice, PlaybackDevice};
use swahilipot_bridge::{MessageFromBackend, MessageToBackend, config::Config};
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::controller::SessionController;
use crate::services;
use crate::state::State;

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let config = match crate::config::load_config().await {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to load config, using defaults: {err}");
            Config::default()
        }
    };

    let device = match HttpStreamDevice::new(&config.device.user_agent) {
        Ok(device) => device,
        Err(err) => {
            log::error!("Failed to create the playback device: {err}");
            return;
        }
    };

    serve(config, device, rx, tx).await;
}

/// Runs the session on `device` until the frontend bridge closes, then
/// releases whatever is still loaded.
pub(crate) async fn serve<D: PlaybackDevice>(
    config: Config,
    device: D,
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) {
    let controller = SessionController::new(device, config.stream.default_uri.clone());
    controller
        .configure_audio_mode(&crate::config::audio_mode(&config.audio_mode))
        .await;
    log::info!("Default stream is {}", controller.default_uri());

    let state = Arc::new(RwLock::new(State { config }));
    let context = Arc::new(AppContext {
        state,
        controller,
        tx,
    });

    let forwarder = tokio::spawn(services::playback_service::forward_session_updates(
        context.clone(),
    ));
    context.consume_bridge_messages(rx).await;

    context.controller.dispose().await;
    forwarder.abort();
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// The returned handle finishes once the frontend side of the bridge is
/// dropped and the session has been released.
pub fn run(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        runtime.block_on(async { setup_backend(rx, tx).await });
    })
}
