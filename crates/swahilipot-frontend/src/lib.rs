//! Player surfaces and their terminal driver.
//!
//! The FM tab screen and the floating mini-player both render from the same
//! [`entities::DataEntities`], which is kept current by messages from the
//! backend. Button presses become intents sent over the bridge.

use anyhow::Context as _;
use swahilipot_bridge::{MessageFromBackend, MessageToBackend};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    entities::DataEntities,
    input::{Command, Surface},
    views::{FrontendUi, PlayerSurface},
};

pub mod entities;
pub mod input;
pub mod views;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    pub async fn send(&self, message: MessageToBackend) -> anyhow::Result<()> {
        self.to_backend
            .send(message)
            .await
            .context("backend is no longer running")
    }

    pub async fn request_config(&self) -> anyhow::Result<()> {
        self.send(MessageToBackend::ConfigurationRequest).await
    }

    pub async fn request_session(&self) -> anyhow::Result<()> {
        self.send(MessageToBackend::SessionRequest).await
    }
}

/// Applies a backend message to the shared entities.
pub fn apply_backend_message(data: &DataEntities, message: MessageFromBackend) {
    match message {
        MessageFromBackend::SessionUpdate(state) => data.session.update(state),
        MessageFromBackend::ConfigurationResponse(config) => data.settings.update(config),
    }
}

/// Re-renders every surface whenever the session or the settings change.
async fn render_on_change(data: DataEntities) {
    let ui = FrontendUi::new(&data);
    let mut session = data.session.subscribe();
    let mut settings = data.settings.subscribe();
    loop {
        println!("{}\n", ui.render());
        tokio::select! {
            changed = session.changed() => if changed.is_err() { return },
            changed = settings.changed() => if changed.is_err() { return },
        }
    }
}

/// Runs the terminal frontend until `quit` or the end of input.
pub fn run(
    rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_terminal(rx, tx))
}

async fn run_terminal(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let data = DataEntities::default();
    let bridge = BackendBridge { to_backend: tx };

    let listener_data = data.clone();
    let listener = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a message from backend: {message:?}");
            apply_backend_message(&listener_data, message);
        }
    });
    let renderer = tokio::spawn(render_on_change(data.clone()));

    bridge.request_config().await?;
    bridge.request_session().await?;

    let ui = FrontendUi::new(&data);
    println!("{}", input::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match input::parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Press(surface, control)) => {
                let intent = match surface {
                    Surface::Fm => ui.fm_screen.press(control),
                    Surface::Mini => ui.floating_player.press(control),
                };
                bridge.send(intent).await?;
            }
            None => println!("{}", input::HELP),
        }
    }

    renderer.abort();
    listener.abort();
    Ok(())
}
