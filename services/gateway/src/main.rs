mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use config::Config;
use envconfig::Envconfig;
use router::create_router;
use state::AppState;
use stream_engine::schema::SchemaLifecycle;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = stream_engine::SERVICE_VERSION, "Starting Gateway API service");

    let config = Config::init_from_env()?;

    if config.private_key.is_none() {
        tracing::warn!("PRIVATE_KEY not set, publishing is disabled");
    }
    if config.publisher_wallet.is_none() {
        tracing::warn!("PUBLISHER_WALLET not set, leaderboard reads are disabled");
    }

    let can_write = config.provider.can_write(config.private_key.as_deref());
    let provider = config.provider.connect(
        &config.bridge_url,
        config.private_key.clone(),
        config.publisher_wallet.as_deref().unwrap_or_default(),
    );

    let state = AppState::new(provider, can_write, config.publisher_wallet.clone())?;

    // Registration runs beside the listener; handlers compute the id lazily
    // if it has not finished.
    let mut lifecycle = SchemaLifecycle::new(state.schema.clone());
    tokio::spawn(async move {
        if let Ok(outcome) = lifecycle.initialize().await {
            tracing::info!(?outcome, "Schema ready");
        }
    });

    let app = create_router(state);

    let addr = config.bind();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
