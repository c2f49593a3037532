fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    let channels = soundboard_bridge::BridgeChannels::default();
    let backend = soundboard_backend::run(channels.backend_rx, channels.backend_tx);
    soundboard_frontend::run(channels.frontend_rx, channels.frontend_tx)?;

    if backend.join().is_err() {
        log::error!("Backend thread panicked");
    }
    Ok(())
}
