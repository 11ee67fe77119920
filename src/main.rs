mod config;
mod source;

use anyhow::Result;
use gyrocast_orientation::OrientationPipeline;
use gyrocast_stream::{serve, Broadcaster, SubscriberRegistry};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Queue depth between the pipeline and the broadcaster.
const ENTRY_QUEUE: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::AppConfig::load()?;

    // Fan-out: computed entries go to every attached subscriber.
    let registry = SubscriberRegistry::new();
    let (entry_tx, entry_rx) = mpsc::channel(ENTRY_QUEUE);
    tokio::spawn(Broadcaster::new(registry.clone(), entry_rx).run());

    // Orientation pipeline: raw samples + sync toggles in, entries out.
    let pipeline = OrientationPipeline::spawn(entry_tx);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for frame subscribers");
    tokio::spawn(serve(
        listener,
        registry.clone(),
        config.queue_capacity,
        config.write_timeout(),
    ));

    info!("Reading beta/gamma/alpha lines from stdin (sync/unsync to calibrate)");
    source::run_stdin_source(pipeline.sample_sender(), pipeline.sync_sender()).await
}
