use crate::state::AppState;
use crate::v1::error::ApiError;
use axum::Json;
use axum::extract::State;
use ingest::load_snapshot;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
pub struct ReloadResponse {
    pub airports: usize,
    pub airlines: usize,
    pub routes: usize,
    pub rejected_rows: usize,
}

/// Re-read the data directory and swap the in-memory snapshot. In-flight
/// report computations finish against the snapshot they started with.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let (snapshot, summaries) = load_snapshot(&state.data_dir)?;
    let response = ReloadResponse {
        airports: snapshot.airports.len(),
        airlines: snapshot.airlines.len(),
        routes: snapshot.routes.len(),
        rejected_rows: summaries.iter().map(|s| s.errors.len()).sum(),
    };

    state.replace_snapshot(snapshot);
    info!(
        airports = response.airports,
        airlines = response.airlines,
        routes = response.routes,
        rejected = response.rejected_rows,
        "snapshot reloaded"
    );
    Ok(Json(response))
}
