//! Pure aggregation engine over a loaded flight snapshot: occupancy
//! ratios, per-country route rankings, per-airline occupancy means and
//! consecutive high-occupancy day runs. Every report is a pure function of
//! an immutable snapshot, so concurrent report computations need no
//! locking.

pub mod occupancy;
pub mod ranking;
pub mod reports;
pub mod runs;

pub use reports::{
    AirlineOccupancy, AirlineRuns, CountryTopRoutes, OccupancyRun, PolicyError, RankedRoute,
    ReportError, ReportPolicy, RouteInRun, RouteScore, consecutive_high_occupancy,
    domestic_consecutive_high_occupancy, most_flown_by_country, occupancy_average,
};
