use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{FeeRecord, FeeStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayFeeRecordCommand {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum PayFeeRecordError {
    #[error("Fee record '{0}' not found")]
    NotFound(Uuid),

    #[error("Fee record '{0}' is already paid")]
    AlreadyPaid(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<FeeRecord, PayFeeRecordError>> for PayFeeRecordCommand {}

impl crate::cqrs::middleware::Command for PayFeeRecordCommand {}

#[tracing::instrument(skip(pool), fields(fee_record_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: PayFeeRecordCommand,
) -> Result<FeeRecord, PayFeeRecordError> {
    let mut tx = pool.begin().await?;

    let status: FeeStatus =
        sqlx::query_scalar("SELECT status FROM fee_records WHERE id = $1 FOR UPDATE")
            .bind(command.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(PayFeeRecordError::NotFound(command.id))?;

    if status == FeeStatus::Paid {
        return Err(PayFeeRecordError::AlreadyPaid(command.id));
    }

    let record = sqlx::query_as::<_, FeeRecord>(
        r#"
        UPDATE fee_records
        SET status = 'Paid', paid_at = NOW(), updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(fee_record_id = %record.id, amount = record.total_amount, "Fee paid");

    Ok(record)
}
