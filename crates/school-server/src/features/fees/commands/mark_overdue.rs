//! Flip Pending fee records past their due date to Overdue

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MarkOverdueCommand {
    /// Reference date; defaults to today (UTC)
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkOverdueResponse {
    pub as_of: NaiveDate,
    pub updated: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum MarkOverdueError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<MarkOverdueResponse, MarkOverdueError>> for MarkOverdueCommand {}

impl crate::cqrs::middleware::Command for MarkOverdueCommand {}

/// Records due strictly before `as_of` become Overdue
pub async fn mark_overdue(pool: &PgPool, as_of: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE fee_records
        SET status = 'Overdue', updated_at = NOW()
        WHERE status = 'Pending' AND due_date < $1
        "#,
    )
    .bind(as_of)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: MarkOverdueCommand,
) -> Result<MarkOverdueResponse, MarkOverdueError> {
    let as_of = command.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let updated = mark_overdue(&pool, as_of).await?;

    if updated > 0 {
        tracing::info!(updated, %as_of, "Fee records marked overdue");
    }

    Ok(MarkOverdueResponse { as_of, updated })
}
