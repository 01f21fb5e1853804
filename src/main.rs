use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use quill_api::config::{self, AppConfig, StoreBackend};
use quill_api::routes;
use quill_api::services::{HttpImageHost, ImageHost, LocalImageHost};
use quill_api::state::AppState;
use quill_api::store::{MemStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("starting quill-api in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("quill-api listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn build_state(config: &AppConfig) -> Result<AppState> {
    let store: Arc<dyn Store> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data will not survive a restart");
            Arc::new(MemStore::new())
        }
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store backend")?;
            let store = PgStore::connect(url, config.store.max_connections)
                .await
                .context("failed to connect to postgres")?;
            Arc::new(store)
        }
    };

    let images: Arc<dyn ImageHost> = match config.images.upload_url.as_deref() {
        Some(url) => Arc::new(
            HttpImageHost::new(url, &config.images.folder)
                .context("invalid IMAGE_HOST_UPLOAD_URL")?,
        ),
        None => {
            tracing::warn!("no image host configured; avatar uploads use local placeholder URLs");
            Arc::new(LocalImageHost::new(&config.images.folder))
        }
    };

    Ok(AppState::new(store, images))
}
