//! School Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the school server workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`SchoolError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup driven by `LOG_*` variables
//! - **Types**: value types shared by the server features, such as [`types::DateRange`]
//!
//! # Example
//!
//! ```no_run
//! use school_common::types::DateRange;
//! use chrono::NaiveDate;
//!
//! fn first_week() -> school_common::Result<DateRange> {
//!     let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2024, 9, 6).unwrap();
//!     DateRange::new(start, end)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SchoolError};
