/// The backend state shared across async tasks: the loaded configuration.
///
/// The playback session is not part of it; it lives in the
/// [`crate::controller::SessionController`], which serializes its own
/// mutations.
#[derive(Debug, Clone)]
pub struct State {
    /// The loaded application configuration.
    pub config: swahilipot_bridge::config::Config,
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
