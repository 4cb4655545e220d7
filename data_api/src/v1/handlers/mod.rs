pub mod admin;
pub mod airlines;
pub mod params;
pub mod routes;
