fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let channels = swahilipot_bridge::BridgeChannels::default();
    let backend = swahilipot_backend::run(channels.backend_rx, channels.backend_tx);
    swahilipot_frontend::run(channels.frontend_rx, channels.frontend_tx)
        .expect("failed to run frontend");

    // the frontend dropped its sender; wait for the backend to release the
    // stream before exiting
    if backend.join().is_err() {
        log::error!("Backend thread panicked");
    }
}
