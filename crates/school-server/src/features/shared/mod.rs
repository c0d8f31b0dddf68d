//! Shared utilities and types for feature modules
//!
//! - **pagination**: page/perPage handling for list queries
//! - **validation**: input checks reused by commands
//! - **error_helpers**: database constraint violation mapping
//! - **export**: CSV encoding for list exports
//! - **search**: escaped LIKE patterns for list filters

pub mod error_helpers;
pub mod export;
pub mod pagination;
pub mod search;
pub mod validation;

pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
