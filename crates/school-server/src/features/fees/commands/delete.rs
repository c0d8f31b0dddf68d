use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFeeRecordCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFeeRecordResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteFeeRecordError {
    #[error("Fee record '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteFeeRecordResponse, DeleteFeeRecordError>> for DeleteFeeRecordCommand {}

impl crate::cqrs::middleware::Command for DeleteFeeRecordCommand {}

#[tracing::instrument(skip(pool), fields(fee_record_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteFeeRecordCommand,
) -> Result<DeleteFeeRecordResponse, DeleteFeeRecordError> {
    let result = sqlx::query("DELETE FROM fee_records WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteFeeRecordError::NotFound(command.id));
    }

    tracing::info!(fee_record_id = %command.id, "Fee record deleted");

    Ok(DeleteFeeRecordResponse {
        id: command.id,
        deleted: true,
    })
}
