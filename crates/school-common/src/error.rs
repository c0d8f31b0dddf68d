//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, SchoolError>;

/// Errors raised outside of the HTTP layer
#[derive(Error, Debug)]
pub enum SchoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange { start: String, end: String },

    #[error("Date range of {days} days exceeds the maximum of {max_days} days")]
    RangeTooLong { days: i64, max_days: i64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SchoolError {
    /// Whether the error was caused by caller input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SchoolError::InvalidDate(_)
                | SchoolError::InvalidRange { .. }
                | SchoolError::RangeTooLong { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_classified() {
        assert!(SchoolError::InvalidDate("x".into()).is_input_error());
        assert!(SchoolError::RangeTooLong {
            days: 400,
            max_days: 366
        }
        .is_input_error());
        assert!(!SchoolError::Config("missing".into()).is_input_error());
    }

    #[test]
    fn test_range_error_message() {
        let err = SchoolError::InvalidRange {
            start: "2024-09-10".into(),
            end: "2024-09-01".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: end date 2024-09-01 is before start date 2024-09-10"
        );
    }
}
