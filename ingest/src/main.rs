use ingest::{IngestError, load_snapshot};
use shared::error::InitializationError;
use shared::load_config;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Loads the configured data directory and reports what a server would see
/// at startup. Useful for validating new reference files before deploying
/// them.
fn main() -> Result<(), AppError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::from)?;

    let config = load_config().map_err(InitializationError::from)?;
    info!(dir = %config.data.dir, "loading reference data");

    let (snapshot, summaries) = load_snapshot(Path::new(&config.data.dir))?;

    for summary in &summaries {
        info!(
            file = %summary.file,
            loaded = summary.loaded,
            rejected = summary.errors.len(),
            "file processed"
        );
        for error in summary.errors.iter().take(10) {
            warn!(file = %summary.file, "{error}");
        }
        if summary.errors.len() > 10 {
            warn!(
                file = %summary.file,
                remaining = summary.errors.len() - 10,
                "additional rows rejected"
            );
        }
    }

    info!(
        airports = snapshot.airports.len(),
        airlines = snapshot.airlines.len(),
        routes = snapshot.routes.len(),
        "reference data load complete"
    );

    Ok(())
}

#[derive(Debug, Error)]
enum AppError {
    #[error("initialization error: {0}")]
    Initialization(#[from] InitializationError),
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
}
