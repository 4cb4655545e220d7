mod state;
mod v1;

use crate::state::AppState;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use ingest::load_snapshot;
use shared::load_config;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let data_dir = PathBuf::from(&config.data.dir);
    let (snapshot, summaries) = load_snapshot(Path::new(&data_dir))?;
    for summary in &summaries {
        if !summary.errors.is_empty() {
            warn!(
                file = %summary.file,
                rejected = summary.errors.len(),
                "rows rejected during startup load"
            );
        }
    }

    let state = AppState::new(snapshot, data_dir, config.analytics.clone());
    let app = Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/v1", v1::router(state));

    let listen_addr = config
        .api
        .map(|api| api.listen_addr)
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());
    info!("starting server at {listen_addr}");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shared::shutdown_listener(None))
        .await?;

    Ok(())
}
