use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::search::contains_pattern;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Teacher, TeacherStatus};

/// Filters shared by the list and export endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFilter {
    /// Case-insensitive match on full name, employee id or email
    pub search: Option<String>,
    /// Exact subject name, case-insensitive
    pub subject: Option<String>,
    pub status: Option<TeacherStatus>,
}

impl TeacherFilter {
    pub(crate) fn search_pattern(&self) -> Option<String> {
        contains_pattern(self.search.as_deref())
    }

    pub(crate) fn subject(&self) -> Option<&str> {
        self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// `WHERE` clause over `teachers` for [`TeacherFilter`], binding $1..$3
pub(crate) const TEACHER_FILTER_SQL: &str = r#"
    WHERE ($1::TEXT IS NULL
           OR LOWER(first_name || ' ' || last_name) LIKE $1 ESCAPE '\'
           OR LOWER(employee_id) LIKE $1 ESCAPE '\'
           OR LOWER(email) LIKE $1 ESCAPE '\')
      AND ($2::TEXT IS NULL
           OR EXISTS (SELECT 1 FROM unnest(subjects) s WHERE LOWER(s) = LOWER($2)))
      AND ($3::teacher_status IS NULL OR status = $3)
"#;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListTeachersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub subject: Option<String>,
    pub status: Option<TeacherStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListTeachersError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Teacher>, ListTeachersError>> for ListTeachersQuery {}

impl crate::cqrs::middleware::Query for ListTeachersQuery {}

impl ListTeachersQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn filter(&self) -> TeacherFilter {
        TeacherFilter {
            search: self.search.clone(),
            subject: self.subject.clone(),
            status: self.status,
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListTeachersQuery,
) -> Result<Paginated<Teacher>, ListTeachersError> {
    let params = query.pagination();
    params.validate().map_err(ListTeachersError::InvalidPagination)?;

    let filter = query.filter();
    let pattern = filter.search_pattern();

    let count_sql = format!("SELECT COUNT(*) FROM teachers {TEACHER_FILTER_SQL}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(pattern.as_deref())
        .bind(filter.subject())
        .bind(filter.status)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "SELECT * FROM teachers {TEACHER_FILTER_SQL} ORDER BY first_name, last_name, id LIMIT $4 OFFSET $5"
    );
    let items = sqlx::query_as::<_, Teacher>(&sql)
        .bind(pattern.as_deref())
        .bind(filter.subject())
        .bind(filter.status)
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_subject_is_ignored() {
        let filter = TeacherFilter {
            subject: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(filter.subject(), None);
    }

    #[test]
    fn test_on_leave_filter_deserializes() {
        let query: ListTeachersQuery =
            serde_json::from_value(serde_json::json!({ "status": "On Leave", "subject": "physics" }))
                .unwrap();
        assert_eq!(query.status, Some(TeacherStatus::OnLeave));
        assert_eq!(query.filter().subject(), Some("physics"));
    }
}
