use std::sync::Arc;

use swahilipot_bridge::session::SessionState;
use tokio::sync::watch;

/// The frontend's single copy of the playback session.
///
/// Fed by the backend's session updates; every surface reads from the same
/// entity, so the tab screen and the mini-player can never disagree.
#[derive(Debug, Clone)]
pub struct SessionEntity {
    state: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionEntity {
    fn default() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
        }
    }
}

impl SessionEntity {
    pub fn update(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
