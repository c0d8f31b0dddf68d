use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::search::contains_pattern;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Student, StudentStatus};

/// Filters shared by the list and export endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    /// Case-insensitive match on full name, admission number or email
    pub search: Option<String>,
    pub class_id: Option<Uuid>,
    pub status: Option<StudentStatus>,
}

impl StudentFilter {
    pub(crate) fn search_pattern(&self) -> Option<String> {
        contains_pattern(self.search.as_deref())
    }
}

/// `WHERE` clause over `students` for [`StudentFilter`], binding $1..$3
pub(crate) const STUDENT_FILTER_SQL: &str = r#"
    WHERE ($1::TEXT IS NULL
           OR LOWER(first_name || ' ' || last_name) LIKE $1 ESCAPE '\'
           OR LOWER(admission_number) LIKE $1 ESCAPE '\'
           OR LOWER(COALESCE(email, '')) LIKE $1 ESCAPE '\')
      AND ($2::UUID IS NULL OR class_id = $2)
      AND ($3::student_status IS NULL OR status = $3)
"#;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub class_id: Option<Uuid>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListStudentsError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Student>, ListStudentsError>> for ListStudentsQuery {}

impl crate::cqrs::middleware::Query for ListStudentsQuery {}

impl ListStudentsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn filter(&self) -> StudentFilter {
        StudentFilter {
            search: self.search.clone(),
            class_id: self.class_id,
            status: self.status,
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListStudentsQuery,
) -> Result<Paginated<Student>, ListStudentsError> {
    let params = query.pagination();
    params.validate().map_err(ListStudentsError::InvalidPagination)?;

    let filter = query.filter();
    let pattern = filter.search_pattern();

    let count_sql = format!("SELECT COUNT(*) FROM students {STUDENT_FILTER_SQL}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(pattern.as_deref())
        .bind(filter.class_id)
        .bind(filter.status)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "SELECT * FROM students {STUDENT_FILTER_SQL} ORDER BY first_name, last_name, id LIMIT $4 OFFSET $5"
    );
    let items = sqlx::query_as::<_, Student>(&sql)
        .bind(pattern.as_deref())
        .bind(filter.class_id)
        .bind(filter.status)
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
