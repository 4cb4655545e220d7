use crate::state::AppState;
use crate::v1::error::ApiError;
use crate::v1::handlers::params::{PageInfo, ReportParams, paginate};
use analytics::{AirlineOccupancy, AirlineRuns, ReportPolicy};
use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Serialize)]
pub struct OccupancyAverageResponse {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub airlines: Vec<AirlineOccupancy>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// Mean occupancy per airline; airlines whose routes all lack a defined
/// ratio report `mean_occupancy: null`.
pub async fn get_occupancy_average(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<OccupancyAverageResponse>, ApiError> {
    let range = params.validate()?;

    let report = analytics::occupancy_average(&state.snapshot(), range)?;
    let (airlines, page_info) = paginate(report, params.page, params.page_size);

    Ok(Json(OccupancyAverageResponse {
        date_from: params.date_from,
        date_to: params.date_to,
        airlines,
        page_info,
    }))
}

#[derive(Serialize)]
pub struct ConsecutiveRunsResponse {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub high_occupancy_threshold: f64,
    pub min_run_length: usize,
    pub airlines: Vec<AirlineRuns>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// Airlines that flew high-occupancy flights on consecutive calendar days.
pub async fn get_consecutive_high_occupancy_routes(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ConsecutiveRunsResponse>, ApiError> {
    let range = params.validate()?;
    let policy = ReportPolicy {
        high_occupancy_threshold: params
            .threshold
            .unwrap_or(state.defaults.high_occupancy_threshold),
        min_run_length: params.min_run_length.unwrap_or(state.defaults.min_run_length),
        // only read by the domestic report; pass the configured default
        min_altitude_delta: state.defaults.min_altitude_delta,
    };

    let report = analytics::consecutive_high_occupancy(&state.snapshot(), range, policy)?;
    let (airlines, page_info) = paginate(report, params.page, params.page_size);

    Ok(Json(ConsecutiveRunsResponse {
        date_from: params.date_from,
        date_to: params.date_to,
        high_occupancy_threshold: policy.high_occupancy_threshold,
        min_run_length: policy.min_run_length,
        airlines,
        page_info,
    }))
}
