pub mod stats;

pub use stats::{DashboardStats, DashboardStatsError, DashboardStatsQuery};
