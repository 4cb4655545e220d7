use crate::state::AppState;
use crate::v1::error::ApiError;
use crate::v1::handlers::params::{PageInfo, ReportParams, paginate};
use analytics::{AirlineRuns, CountryTopRoutes, ReportPolicy, RouteScore};
use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Serialize)]
pub struct MostFlownByCountryResponse {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub score: RouteScore,
    pub countries: Vec<CountryTopRoutes>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// Top N most flown routes per origin country.
pub async fn get_most_flown_by_country(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<MostFlownByCountryResponse>, ApiError> {
    let range = params.validate()?;
    let score = params.score.unwrap_or_default();
    let top_n = params.top_n.unwrap_or(state.defaults.top_routes_per_country);

    let report = analytics::most_flown_by_country(&state.snapshot(), range, score, top_n)?;
    let (countries, page_info) = paginate(report, params.page, params.page_size);

    Ok(Json(MostFlownByCountryResponse {
        date_from: params.date_from,
        date_to: params.date_to,
        score,
        countries,
        page_info,
    }))
}

#[derive(Serialize)]
pub struct DomesticRunsResponse {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub high_occupancy_threshold: f64,
    pub min_run_length: usize,
    pub min_altitude_delta: i32,
    pub airlines: Vec<AirlineRuns>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// Domestic high-occupancy consecutive-day runs, each flight annotated
/// with its origin-minus-destination altitude delta and whether that
/// delta exceeds the configured minimum.
pub async fn get_domestic_high_occupancy_altitude_delta(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<DomesticRunsResponse>, ApiError> {
    let range = params.validate()?;
    let policy = ReportPolicy {
        high_occupancy_threshold: params
            .threshold
            .unwrap_or(state.defaults.high_occupancy_threshold),
        min_run_length: params.min_run_length.unwrap_or(state.defaults.min_run_length),
        min_altitude_delta: params
            .min_altitude_delta
            .unwrap_or(state.defaults.min_altitude_delta),
    };

    let report = analytics::domestic_consecutive_high_occupancy(&state.snapshot(), range, policy)?;
    let (airlines, page_info) = paginate(report, params.page, params.page_size);

    Ok(Json(DomesticRunsResponse {
        date_from: params.date_from,
        date_to: params.date_to,
        high_occupancy_threshold: policy.high_occupancy_threshold,
        min_run_length: policy.min_run_length,
        min_altitude_delta: policy.min_altitude_delta,
        airlines,
        page_info,
    }))
}
