//! Fee records
//!
//! Every persisted record satisfies `total_amount == Σ fee_items[].amount`;
//! commands recompute the total through [`computation::validate_fee_items`]
//! whenever the items change.

pub mod computation;
pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::fees_routes;
