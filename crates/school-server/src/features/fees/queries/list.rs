use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{FeeRecord, FeeStatus};

/// Fee record joined with the student's name and class
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecordDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: FeeRecord,
    pub student_name: Option<String>,
    pub admission_number: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
}

pub(crate) const FEE_DETAIL_SELECT: &str = r#"
    SELECT f.*,
           NULLIF(TRIM(CONCAT(s.first_name, ' ', s.last_name)), '') AS student_name,
           s.admission_number,
           s.class_name,
           s.section
    FROM fee_records f
    LEFT JOIN students s ON s.id = f.student_id
"#;

const FEE_FILTER_SQL: &str = r#"
    WHERE ($1::UUID IS NULL OR f.student_id = $1)
      AND ($2::fee_status IS NULL OR f.status = $2)
"#;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFeeRecordsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub student_id: Option<Uuid>,
    pub status: Option<FeeStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListFeeRecordsError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<FeeRecordDetail>, ListFeeRecordsError>> for ListFeeRecordsQuery {}

impl crate::cqrs::middleware::Query for ListFeeRecordsQuery {}

impl ListFeeRecordsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListFeeRecordsQuery,
) -> Result<Paginated<FeeRecordDetail>, ListFeeRecordsError> {
    let params = query.pagination();
    params.validate().map_err(ListFeeRecordsError::InvalidPagination)?;

    let count_sql = format!("SELECT COUNT(*) FROM fee_records f {FEE_FILTER_SQL}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(query.student_id)
        .bind(query.status)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "{FEE_DETAIL_SELECT} {FEE_FILTER_SQL} ORDER BY f.due_date DESC, f.created_at DESC, f.id LIMIT $3 OFFSET $4"
    );
    let items = sqlx::query_as::<_, FeeRecordDetail>(&sql)
        .bind(query.student_id)
        .bind(query.status)
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
    fn test_query_string_fields() {
        let query: ListFeeRecordsQuery = serde_json::from_value(serde_json::json!({
            "studentId": Uuid::nil(),
            "status": "Overdue",
            "page": 2
        }))
        .unwrap();
        assert_eq!(query.status, Some(FeeStatus::Overdue));
        assert_eq!(query.pagination().page(), 2);
    }
}
