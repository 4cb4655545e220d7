use shared::model::Route;

/// Shared definition of "high occupancy" for the consecutive-run reports.
/// Config may override it per deployment; both reports must use one value.
pub const DEFAULT_HIGH_OCCUPANCY_THRESHOLD: f64 = 0.85;

/// Occupancy ratio of a single route-flight, or `None` when the ratio is
/// undefined (seats <= 0). Undefined is a distinct state, not 0%: such
/// routes are excluded from every ratio-based aggregate.
pub fn occupancy_ratio(route: &Route) -> Option<f64> {
    if route.total_seats <= 0 {
        return None;
    }
    Some(route.tickets_sold as f64 / route.total_seats as f64)
}

pub fn is_high_occupancy(route: &Route, threshold: f64) -> bool {
    occupancy_ratio(route).is_some_and(|ratio| ratio >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn route(tickets_sold: i64, total_seats: i64) -> Route {
        Route {
            id: 1,
            airline_id: 1,
            airline_code: "XX".to_string(),
            origin_id: 1,
            origin_code: "AAA".to_string(),
            destination_id: 2,
            destination_code: "BBB".to_string(),
            codeshare: false,
            stops: 0,
            equipment: None,
            tickets_sold,
            total_seats,
            price: None,
            kilometers: None,
            flight_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn ratio_is_tickets_over_seats() {
        assert_eq!(occupancy_ratio(&route(90, 100)), Some(0.9));
        assert_eq!(occupancy_ratio(&route(0, 100)), Some(0.0));
    }

    #[test]
    fn ratio_is_undefined_for_nonpositive_seats() {
        assert_eq!(occupancy_ratio(&route(10, 0)), None);
        assert_eq!(occupancy_ratio(&route(10, -5)), None);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_high_occupancy(&route(85, 100), 0.85));
        assert!(!is_high_occupancy(&route(84, 100), 0.85));
        // undefined ratio never classifies as high occupancy
        assert!(!is_high_occupancy(&route(10, 0), 0.85));
    }
}
