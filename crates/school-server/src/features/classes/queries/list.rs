use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::classes::types::{ClassDetail, CLASS_DETAIL_SELECT};
use crate::features::shared::search::contains_pattern;
use crate::features::shared::{Paginated, PaginationParams};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub academic_year: Option<String>,
    /// Case-insensitive match on name or section
    pub search: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListClassesError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<ClassDetail>, ListClassesError>> for ListClassesQuery {}

impl crate::cqrs::middleware::Query for ListClassesQuery {}

impl ListClassesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListClassesError> {
        self.pagination()
            .validate()
            .map_err(ListClassesError::InvalidPagination)
    }

    fn search_pattern(&self) -> Option<String> {
        contains_pattern(self.search.as_deref())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListClassesQuery,
) -> Result<Paginated<ClassDetail>, ListClassesError> {
    query.validate()?;

    let params = query.pagination();
    let pattern = query.search_pattern();

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM classes c
        WHERE ($1::TEXT IS NULL OR c.academic_year = $1)
          AND ($2::TEXT IS NULL OR LOWER(c.name) LIKE $2 ESCAPE '\' OR LOWER(c.section) LIKE $2 ESCAPE '\')
        "#,
    )
    .bind(query.academic_year.as_deref())
    .bind(pattern.as_deref())
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        r#"{CLASS_DETAIL_SELECT}
        WHERE ($1::TEXT IS NULL OR c.academic_year = $1)
          AND ($2::TEXT IS NULL OR LOWER(c.name) LIKE $2 ESCAPE '\' OR LOWER(c.section) LIKE $2 ESCAPE '\')
        ORDER BY c.academic_year DESC, c.name, c.section
        LIMIT $3 OFFSET $4
        "#
    );

    let items = sqlx::query_as::<_, ClassDetail>(&sql)
        .bind(query.academic_year.as_deref())
        .bind(pattern.as_deref())
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
