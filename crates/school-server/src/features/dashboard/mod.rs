//! Admin dashboard counters

pub mod queries;
pub mod routes;

pub use routes::dashboard_routes;
