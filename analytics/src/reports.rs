use crate::occupancy::{DEFAULT_HIGH_OCCUPANCY_THRESHOLD, occupancy_ratio};
use crate::ranking::rank_top_n;
use crate::runs::consecutive_runs;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::model::{DateRange, FlightSnapshot, Route, SnapshotError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("top_n must be positive")]
    NonPositiveTopN,
    #[error("min_run_length must be positive")]
    NonPositiveMinRunLength,
    #[error("high_occupancy_threshold must be finite and non-negative")]
    InvalidThreshold,
    #[error("min_altitude_delta must be non-negative")]
    NegativeMinAltitudeDelta,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Policy knobs for the high-occupancy run reports. Validated before any
/// computation starts; invalid values are rejected, never clamped.
#[derive(Debug, Clone, Copy)]
pub struct ReportPolicy {
    pub high_occupancy_threshold: f64,
    pub min_run_length: usize,
    /// Absolute altitude difference (meters) above which a domestic
    /// flight counts as high-altitude-delta. Only the domestic report
    /// reads it.
    pub min_altitude_delta: i32,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            high_occupancy_threshold: DEFAULT_HIGH_OCCUPANCY_THRESHOLD,
            min_run_length: 2,
            min_altitude_delta: 1000,
        }
    }
}

impl ReportPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.high_occupancy_threshold.is_finite() || self.high_occupancy_threshold < 0.0 {
            return Err(PolicyError::InvalidThreshold);
        }
        if self.min_run_length == 0 {
            return Err(PolicyError::NonPositiveMinRunLength);
        }
        if self.min_altitude_delta < 0 {
            return Err(PolicyError::NegativeMinAltitudeDelta);
        }
        Ok(())
    }
}

/// Score used to rank routes within a country. Flight count is the
/// default; the alternatives weight by demand and distance instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteScore {
    #[default]
    FlightCount,
    TicketsSold,
    Kilometers,
}

impl RouteScore {
    fn score(&self, members: &[&Route]) -> u64 {
        match self {
            RouteScore::FlightCount => members.len() as u64,
            RouteScore::TicketsSold => members
                .iter()
                .map(|r| r.tickets_sold.max(0) as u64)
                .sum(),
            // Kilometers are summed then rounded so scores stay totally
            // ordered; unknown distances contribute nothing.
            RouteScore::Kilometers => members
                .iter()
                .filter_map(|r| r.kilometers)
                .sum::<f64>()
                .round() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RankedRoute {
    pub origin_code: String,
    pub destination_code: String,
    pub score: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountryTopRoutes {
    pub country: String,
    pub routes: Vec<RankedRoute>,
}

/// Top `top_n` routes per origin-airport country, ranked by `score`.
/// Output is ordered by country, then descending score with ties broken by
/// ascending origin/destination pair.
pub fn most_flown_by_country(
    snapshot: &FlightSnapshot,
    range: DateRange,
    score: RouteScore,
    top_n: usize,
) -> Result<Vec<CountryTopRoutes>, ReportError> {
    if top_n == 0 {
        return Err(PolicyError::NonPositiveTopN.into());
    }

    let mut by_country: BTreeMap<&str, Vec<&Route>> = BTreeMap::new();
    for route in &snapshot.routes {
        if !range.contains(route.flight_date) {
            continue;
        }
        let origin = snapshot.origin_of(route)?;
        by_country.entry(&origin.country).or_default().push(route);
    }

    let report = by_country
        .into_iter()
        .map(|(country, routes)| CountryTopRoutes {
            country: country.to_string(),
            routes: rank_top_n(
                routes,
                |r| (r.origin_code.clone(), r.destination_code.clone()),
                |members| score.score(members),
                top_n,
            )
            .into_iter()
            .map(|group| RankedRoute {
                origin_code: group.key.0,
                destination_code: group.key.1,
                score: group.score,
            })
            .collect(),
        })
        .collect::<Vec<_>>();

    debug!(countries = report.len(), "ranked routes by country");
    Ok(report)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AirlineOccupancy {
    pub airline_id: i32,
    pub airline_name: String,
    pub airline_code: Option<String>,
    /// Unweighted mean of defined occupancy ratios; `None` when the
    /// airline has no route with a defined ratio in the range.
    pub mean_occupancy: Option<f64>,
    pub flights_with_ratio: usize,
    pub total_flights: usize,
}

/// Mean occupancy per airline over the date range. Routes with an
/// undefined ratio (seats <= 0) are excluded from both the sum and the
/// count; an airline left with none reports no data rather than 0.
pub fn occupancy_average(
    snapshot: &FlightSnapshot,
    range: DateRange,
) -> Result<Vec<AirlineOccupancy>, ReportError> {
    #[derive(Default)]
    struct Acc {
        ratio_sum: f64,
        with_ratio: usize,
        total: usize,
    }

    let mut per_airline: BTreeMap<i32, Acc> = BTreeMap::new();
    for route in &snapshot.routes {
        if !range.contains(route.flight_date) {
            continue;
        }
        // Resolve eagerly so a dangling airline id surfaces even when the
        // route carries no defined ratio.
        snapshot.airline_of(route)?;
        let acc = per_airline.entry(route.airline_id).or_default();
        acc.total += 1;
        if let Some(ratio) = occupancy_ratio(route) {
            acc.ratio_sum += ratio;
            acc.with_ratio += 1;
        }
    }

    let mut report = per_airline
        .into_iter()
        .map(|(airline_id, acc)| {
            let airline = &snapshot.airlines[&airline_id];
            AirlineOccupancy {
                airline_id,
                airline_name: airline.name.clone(),
                airline_code: airline.iata_code.clone(),
                mean_occupancy: (acc.with_ratio > 0).then(|| acc.ratio_sum / acc.with_ratio as f64),
                flights_with_ratio: acc.with_ratio,
                total_flights: acc.total,
            }
        })
        .collect::<Vec<_>>();

    // Highest mean first; no-data airlines last; airline id settles ties.
    report.sort_by(|a, b| match (a.mean_occupancy, b.mean_occupancy) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(a.airline_id.cmp(&b.airline_id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.airline_id.cmp(&b.airline_id),
    });

    Ok(report)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteInRun {
    pub route_id: i64,
    pub origin_code: String,
    pub destination_code: String,
    pub flight_date: NaiveDate,
    pub occupancy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_delta: Option<i32>,
    /// Whether the flight's absolute altitude delta exceeds the policy's
    /// `min_altitude_delta`. Unset outside the domestic report and for
    /// airports with unknown altitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_altitude_delta: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OccupancyRun {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub length_days: usize,
    pub routes: Vec<RouteInRun>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AirlineRuns {
    pub airline_id: i32,
    pub airline_name: String,
    pub airline_code: String,
    pub runs: Vec<OccupancyRun>,
}

/// Airlines that operated high-occupancy flights on consecutive calendar
/// days, with every maximal run of at least `policy.min_run_length` days
/// and the flights that covered it.
pub fn consecutive_high_occupancy(
    snapshot: &FlightSnapshot,
    range: DateRange,
    policy: ReportPolicy,
) -> Result<Vec<AirlineRuns>, ReportError> {
    runs_report(snapshot, range, policy, false)
}

/// Domestic variant: only routes whose origin and destination share a
/// country qualify, and each reported flight carries its signed altitude
/// delta plus whether that delta exceeds `policy.min_altitude_delta`.
/// Run-detection semantics are unchanged.
pub fn domestic_consecutive_high_occupancy(
    snapshot: &FlightSnapshot,
    range: DateRange,
    policy: ReportPolicy,
) -> Result<Vec<AirlineRuns>, ReportError> {
    runs_report(snapshot, range, policy, true)
}

fn runs_report(
    snapshot: &FlightSnapshot,
    range: DateRange,
    policy: ReportPolicy,
    domestic_only: bool,
) -> Result<Vec<AirlineRuns>, ReportError> {
    policy.validate()?;

    let mut per_airline: BTreeMap<i32, Vec<(&Route, f64)>> = BTreeMap::new();
    for route in &snapshot.routes {
        if !range.contains(route.flight_date) {
            continue;
        }
        let Some(ratio) = occupancy_ratio(route) else {
            continue;
        };
        if ratio < policy.high_occupancy_threshold {
            continue;
        }
        if domestic_only && !snapshot.is_domestic(route)? {
            continue;
        }
        per_airline.entry(route.airline_id).or_default().push((route, ratio));
    }

    let mut report = Vec::new();
    for (airline_id, mut flights) in per_airline {
        let airline = snapshot.airline_of(flights[0].0)?;
        flights.sort_by_key(|(route, _)| (route.flight_date, route.id));

        let runs = consecutive_runs(
            flights.iter().map(|(route, _)| route.flight_date),
            policy.min_run_length,
        );
        if runs.is_empty() {
            continue;
        }

        let mut airline_runs = Vec::with_capacity(runs.len());
        for run in runs {
            let mut routes = Vec::new();
            for &(route, occupancy) in flights.iter().filter(|(r, _)| run.contains(r.flight_date)) {
                let altitude_delta = if domestic_only {
                    snapshot.altitude_delta(route)?
                } else {
                    None
                };
                routes.push(RouteInRun {
                    route_id: route.id,
                    origin_code: route.origin_code.clone(),
                    destination_code: route.destination_code.clone(),
                    flight_date: route.flight_date,
                    occupancy,
                    altitude_delta,
                    high_altitude_delta: altitude_delta
                        .map(|delta| delta.abs() > policy.min_altitude_delta),
                });
            }
            airline_runs.push(OccupancyRun {
                start_date: run.start,
                end_date: run.end,
                length_days: run.len_days(),
                routes,
            });
        }

        report.push(AirlineRuns {
            airline_id,
            airline_name: airline.name.clone(),
            airline_code: airline
                .iata_code
                .clone()
                .unwrap_or_else(|| airline.icao_code.clone().unwrap_or_default()),
            runs: airline_runs,
        });
    }

    debug!(
        airlines = report.len(),
        domestic_only, "detected consecutive high-occupancy runs"
    );
    Ok(report)
}
