use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::ClassIncharge;

/// Assignment joined with teacher and class names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InchargeDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assignment: ClassIncharge,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListInchargesQuery {
    pub class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    /// Defaults to true; pass `false` to include past assignments
    pub active_only: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListInchargesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<InchargeDetail>, ListInchargesError>> for ListInchargesQuery {}

impl crate::cqrs::middleware::Query for ListInchargesQuery {}

impl ListInchargesQuery {
    pub fn active_only(&self) -> bool {
        self.active_only.unwrap_or(true)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListInchargesQuery,
) -> Result<Vec<InchargeDetail>, ListInchargesError> {
    let rows = sqlx::query_as::<_, InchargeDetail>(
        r#"
        SELECT ci.*,
               NULLIF(TRIM(CONCAT(t.first_name, ' ', t.last_name)), '') AS teacher_name,
               t.email AS teacher_email,
               c.name AS class_name,
               c.section,
               c.academic_year
        FROM class_incharges ci
        LEFT JOIN teachers t ON t.id = ci.teacher_id
        LEFT JOIN classes c ON c.id = ci.class_id
        WHERE ($1::UUID IS NULL OR ci.class_id = $1)
          AND ($2::UUID IS NULL OR ci.teacher_id = $2)
          AND (NOT $3 OR ci.is_active)
        ORDER BY ci.is_active DESC, ci.assigned_at DESC, ci.id
        "#,
    )
    .bind(query.class_id)
    .bind(query.teacher_id)
    .bind(query.active_only())
    .fetch_all(&pool)
    .await?;

    Ok(rows)
}
