//! Database error handling utilities
//!
//! ```rust,ignore
//! sqlx::query(...)
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, CreateTeacherError::Duplicate(email), CreateTeacherError::Database))?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Name of the violated constraint, when the driver reports one
pub fn constraint_name(error: &SqlxError) -> Option<&str> {
    if let SqlxError::Database(db_err) = error {
        return db_err.constraint();
    }
    None
}

/// Map a unique violation to `unique_error`, anything else through `default_wrapper`
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Like [`map_unique_violation`] but lets the caller see which constraint fired
pub fn map_unique_violation_with<E, U, F>(error: SqlxError, on_unique: U, default_wrapper: F) -> E
where
    U: FnOnce(Option<&str>) -> E,
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        on_unique(constraint_name(&error))
    } else {
        default_wrapper(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Duplicate,
        Database(String),
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_unique_violation(SqlxError::RowNotFound, TestError::Duplicate, |e| {
            TestError::Database(e.to_string())
        });
        assert!(matches!(err, TestError::Database(_)));
        assert!(!is_unique_violation(&SqlxError::PoolTimedOut));
        assert!(constraint_name(&SqlxError::PoolTimedOut).is_none());
    }

    #[test]
    fn test_map_with_passes_through_other_errors() {
        let err = map_unique_violation_with(
            SqlxError::RowNotFound,
            |_| TestError::Duplicate,
            |e| TestError::Database(e.to_string()),
        );
        assert_ne!(err, TestError::Duplicate);
    }
}
