//! Class incharge assignment
//!
//! A class has at most one active incharge. Assignment changes are computed
//! by [`state::InchargeState`] and applied inside one transaction, backed by
//! a partial unique index on active rows.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod state;

pub use routes::class_incharge_routes;
