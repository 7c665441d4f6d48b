mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::storage::{BlobStore, HttpBlobStore};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("no .env loaded: {e}");
    }
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    // Image storage is optional: uploads answer 503 without it.
    let storage: Option<Arc<dyn BlobStore>> = match config.storage.as_ref().map(HttpBlobStore::new) {
        Some(Ok(store)) => {
            tracing::info!(bucket = store.bucket(), "image storage initialized");
            Some(Arc::new(store))
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "image storage client failed; uploads disabled");
            None
        }
        None => {
            tracing::warn!("image storage not configured; uploads disabled");
            None
        }
    };

    let state = state::AppState::new(pool, config, storage);

    let loaded = services::ads::hydrate(&state).await.expect("ad hydration failed");
    tracing::info!(ads = loaded, "ad list hydrated");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "billboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
