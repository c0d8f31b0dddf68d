//! Attendance marking, listing and reporting
//!
//! Marking is restricted to the class's active incharge. Reports are built
//! by the pure functions in [`aggregation`].

pub mod aggregation;
pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::attendance_routes;

/// Longest date range accepted by reports and summaries
pub const MAX_REPORT_DAYS: i64 = 366;
