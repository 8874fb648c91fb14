mod api;
mod config;
mod dto;
mod error;
mod state;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "picstore_web=debug,picstore_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;

    for dir in [&config.storage.uploads_dir, &config.storage.previews_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating storage directory {}", dir.display()))?;
    }
    tracing::info!(
        uploads = %config.storage.uploads_dir.display(),
        previews = %config.storage.previews_dir.display(),
        cache_key = ?config.preview.cache_key,
        "storage ready"
    );

    let app = api::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("picstore-web listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
