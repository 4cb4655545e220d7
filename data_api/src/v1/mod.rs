mod error;
mod handlers;

use crate::state::AppState;
use crate::v1::handlers::admin::reload;
use crate::v1::handlers::airlines::{
    get_consecutive_high_occupancy_routes, get_occupancy_average,
};
use crate::v1::handlers::routes::{
    get_domestic_high_occupancy_altitude_delta, get_most_flown_by_country,
};
use axum::Router;
use axum::routing::{get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/routes/most_flown_by_country", get(get_most_flown_by_country))
        .route(
            "/routes/domestic_high_occupancy_altitude_delta",
            get(get_domestic_high_occupancy_altitude_delta),
        )
        .route("/airlines/occupancy_average", get(get_occupancy_average))
        .route(
            "/airlines/consecutive_high_occupancy_routes",
            get(get_consecutive_high_occupancy_routes),
        )
        .route("/reload", post(reload))
        .with_state(state)
}
