mod config;

use std::sync::Arc;

use config::Config;
use envconfig::Envconfig;
use stream_engine::feed::{FeedPoller, LogSink};
use stream_engine::schema::SchemaHandle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::init_from_env()
        .map_err(|e| anyhow::anyhow!("failed to load configuration (is PUBLISHER_WALLET set?): {}", e))?;

    tracing::info!(
        version = stream_engine::SERVICE_VERSION,
        publisher = %config.publisher_wallet,
        "Starting score feed"
    );

    // Reads need no signing credential.
    let provider = config
        .provider
        .connect(&config.bridge_url, None, &config.publisher_wallet);
    let schema = Arc::new(SchemaHandle::player(provider.clone()));

    match schema.schema_id().await {
        Ok(id) => tracing::info!(schema_id = %id, "Watching schema"),
        Err(e) => tracing::warn!(error = %e, "Schema id unavailable, will retry on each poll"),
    }

    let poller = FeedPoller::new(
        provider,
        schema,
        config.publisher_wallet.clone(),
        LogSink,
        config.feed(),
    );

    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down score feed");
        }
    }

    Ok(())
}
