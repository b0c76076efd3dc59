use std::net::SocketAddr;

use mimalloc::MiMalloc;
use nexus_scan::config::AppConfig;
use nexus_scan::store::KvStore;
use nexus_scan::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_scan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let kv = KvStore::from_config(config.redis_url.as_deref())
        .await
        .expect("Failed to open key-value store");
    tracing::info!(store = ?kv, "Key-value store ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(host = %addr, "Starting NexusScan API server");

    let state = AppState { kv, config };
    let app = nexus_scan::routes::app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
