use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Static airport reference record. Coordinates and altitude are optional
/// because the source `.dat` file uses `\N` for unknown values; altitude is
/// only consumed by the domestic altitude-delta report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub country: String,
    pub code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i32>,
    pub utc_offset: Option<f64>,
    pub continent: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    pub id: i32,
    pub name: String,
    pub alias: Option<String>,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub callsign: Option<String>,
    pub country: Option<String>,
    pub active: bool,
}

/// One flight of a route on a calendar day. References its airline and both
/// airports by id only; ownership of those records lies with the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub airline_id: i32,
    pub airline_code: String,
    pub origin_id: i32,
    pub origin_code: String,
    pub destination_id: i32,
    pub destination_code: String,
    pub codeshare: bool,
    pub stops: u32,
    pub equipment: Option<String>,
    pub tickets_sold: i64,
    pub total_seats: i64,
    pub price: Option<f64>,
    pub kilometers: Option<f64>,
    pub flight_date: NaiveDate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("route {route_id} references unknown airport {airport_id}")]
    UnknownAirport { route_id: i64, airport_id: i32 },
    #[error("route {route_id} references unknown airline {airline_id}")]
    UnknownAirline { route_id: i64, airline_id: i32 },
}

/// Fully materialized, read-only input to the analytics engine. Built once
/// by the ingestion layer; reports never mutate it.
#[derive(Debug, Clone, Default)]
pub struct FlightSnapshot {
    pub airports: HashMap<i32, Airport>,
    pub airlines: HashMap<i32, Airline>,
    pub routes: Vec<Route>,
}

impl FlightSnapshot {
    /// Resolve a route's airline. Ingestion validates references up front,
    /// so a miss here is a data-integrity bug and fails fast rather than
    /// silently skewing an aggregate.
    pub fn airline_of(&self, route: &Route) -> Result<&Airline, SnapshotError> {
        self.airlines
            .get(&route.airline_id)
            .ok_or(SnapshotError::UnknownAirline {
                route_id: route.id,
                airline_id: route.airline_id,
            })
    }

    pub fn origin_of(&self, route: &Route) -> Result<&Airport, SnapshotError> {
        self.airport(route.id, route.origin_id)
    }

    pub fn destination_of(&self, route: &Route) -> Result<&Airport, SnapshotError> {
        self.airport(route.id, route.destination_id)
    }

    fn airport(&self, route_id: i64, airport_id: i32) -> Result<&Airport, SnapshotError> {
        self.airports
            .get(&airport_id)
            .ok_or(SnapshotError::UnknownAirport {
                route_id,
                airport_id,
            })
    }

    /// A route is domestic when origin and destination share a country.
    pub fn is_domestic(&self, route: &Route) -> Result<bool, SnapshotError> {
        let origin = self.origin_of(route)?;
        let destination = self.destination_of(route)?;
        Ok(origin.country == destination.country)
    }

    /// Signed altitude delta (origin minus destination) in meters, when
    /// both airports carry an altitude.
    pub fn altitude_delta(&self, route: &Route) -> Result<Option<i32>, SnapshotError> {
        let origin = self.origin_of(route)?;
        let destination = self.destination_of(route)?;
        Ok(match (origin.altitude, destination.altitude) {
            (Some(o), Some(d)) => Some(o - d),
            _ => None,
        })
    }
}

/// Inclusive calendar-day filter shared by all report endpoints. An open
/// bound means no restriction on that side.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: i32, country: &str, altitude: Option<i32>) -> Airport {
        Airport {
            id,
            name: format!("Airport {id}"),
            city: "City".to_string(),
            country: country.to_string(),
            code: None,
            latitude: None,
            longitude: None,
            altitude,
            utc_offset: None,
            continent: None,
            timezone: None,
        }
    }

    fn route(id: i64, origin_id: i32, destination_id: i32) -> Route {
        Route {
            id,
            airline_id: 1,
            airline_code: "XX".to_string(),
            origin_id,
            origin_code: "AAA".to_string(),
            destination_id,
            destination_code: "BBB".to_string(),
            codeshare: false,
            stops: 0,
            equipment: None,
            tickets_sold: 100,
            total_seats: 150,
            price: None,
            kilometers: None,
            flight_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn snapshot() -> FlightSnapshot {
        FlightSnapshot {
            airports: [
                (1, airport(1, "Spain", Some(369))),
                (2, airport(2, "Spain", Some(1500))),
                (3, airport(3, "France", None)),
            ]
            .into(),
            airlines: HashMap::new(),
            routes: Vec::new(),
        }
    }

    #[test]
    fn domestic_requires_matching_countries() {
        let snap = snapshot();
        assert_eq!(snap.is_domestic(&route(1, 1, 2)), Ok(true));
        assert_eq!(snap.is_domestic(&route(2, 1, 3)), Ok(false));
    }

    #[test]
    fn unknown_airport_reference_fails_fast() {
        let snap = snapshot();
        assert_eq!(
            snap.is_domestic(&route(7, 1, 99)),
            Err(SnapshotError::UnknownAirport {
                route_id: 7,
                airport_id: 99
            })
        );
    }

    #[test]
    fn altitude_delta_is_signed_origin_minus_destination() {
        let snap = snapshot();
        assert_eq!(snap.altitude_delta(&route(1, 2, 1)), Ok(Some(1131)));
        assert_eq!(snap.altitude_delta(&route(2, 1, 2)), Ok(Some(-1131)));
        assert_eq!(snap.altitude_delta(&route(3, 1, 3)), Ok(None));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let range = DateRange {
            from: Some(day(10)),
            to: Some(day(12)),
        };
        assert!(range.contains(day(10)));
        assert!(range.contains(day(12)));
        assert!(!range.contains(day(13)));
        assert!(DateRange::default().contains(day(1)));
    }
}
