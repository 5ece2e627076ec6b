use swahilipot_audio::PlaybackDevice;
use swahilipot_bridge::MessageFromBackend;

/// Handles an incoming play intent (see
/// [`swahilipot_bridge::MessageToBackend::Play`]).
pub async fn handle_play_request<D: PlaybackDevice>(
    context: super::AppContextHandle<D>,
    uri: Option<String>,
    title: Option<String>,
) {
    context
        .controller
        .play(uri.as_deref(), title.as_deref())
        .await;
}

pub async fn handle_pause_request<D: PlaybackDevice>(context: super::AppContextHandle<D>) {
    context.controller.pause().await;
}

pub async fn handle_stop_request<D: PlaybackDevice>(context: super::AppContextHandle<D>) {
    context.controller.stop().await;
}

/// Handles an incoming toggle intent (see
/// [`swahilipot_bridge::MessageToBackend::Toggle`]).
pub async fn handle_toggle_request<D: PlaybackDevice>(
    context: super::AppContextHandle<D>,
    uri: Option<String>,
    title: Option<String>,
) {
    context
        .controller
        .toggle(uri.as_deref(), title.as_deref())
        .await;
}

/// Answers with the current session state.
pub async fn handle_session_request<D: PlaybackDevice>(context: super::AppContextHandle<D>) {
    let state = context.controller.snapshot();
    context.send(MessageFromBackend::SessionUpdate(state)).await;
}

/// Pushes the session state to the frontend every time it changes, starting
/// with the current one. Runs until the controller or the frontend is gone.
pub async fn forward_session_updates<D: PlaybackDevice>(context: super::AppContextHandle<D>) {
    let mut updates = context.controller.subscribe();
    loop {
        let state = updates.borrow_and_update().clone();
        log::debug!("Session changed: {:?}", state.phase());
        context.send(MessageFromBackend::SessionUpdate(state)).await;

        if context.tx.is_closed() || updates.changed().await.is_err() {
            return;
        }
    }
}
