use swahilipot_audio::PlaybackDevice;

/// Handles an incoming configuration request (see
/// [`swahilipot_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request<D: PlaybackDevice>(context: super::AppContextHandle<D>) {
    let config = {
        let state = context.state.read().await;
        state.config.clone()
    };
    context
        .send(swahilipot_bridge::MessageFromBackend::ConfigurationResponse(
            config,
        ))
        .await;
}
