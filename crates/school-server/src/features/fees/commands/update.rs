use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::features::fees::computation::{normalize_fee_items, validate_fee_items, FeeItemsError};
use crate::features::shared::validation::{
    validate_optional_length, FieldValidationError, MAX_TEXT_LENGTH,
};
use crate::models::{FeeItem, FeeRecord, FeeStatus};

/// Partial update; replacing `feeItems` recomputes the total
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRecordCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub fee_items: Option<Vec<FeeItem>>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<FeeStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateFeeRecordError {
    #[error("{0}")]
    Items(#[from] FeeItemsError),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Nothing to update")]
    NoFieldsToUpdate,

    #[error("Fee record '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<FeeRecord, UpdateFeeRecordError>> for UpdateFeeRecordCommand {}

impl crate::cqrs::middleware::Command for UpdateFeeRecordCommand {}

impl UpdateFeeRecordCommand {
    /// Validates and returns the new total when items are being replaced
    pub fn validate(&self) -> Result<Option<i64>, UpdateFeeRecordError> {
        if self.fee_items.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.remarks.is_none()
        {
            return Err(UpdateFeeRecordError::NoFieldsToUpdate);
        }
        validate_optional_length("remarks", self.remarks.as_deref(), MAX_TEXT_LENGTH)?;
        let total = match self.fee_items {
            Some(ref items) => Some(validate_fee_items(items)?),
            None => None,
        };
        Ok(total)
    }
}

#[tracing::instrument(skip(pool, command), fields(fee_record_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateFeeRecordCommand,
) -> Result<FeeRecord, UpdateFeeRecordError> {
    let total = command.validate()?;
    let items = command.fee_items.clone().map(normalize_fee_items);

    // A blank remarks string clears the column, matching create
    // paid_at follows status: stamped on the first move to Paid, cleared on leaving it
    let record = sqlx::query_as::<_, FeeRecord>(
        r#"
        UPDATE fee_records
        SET fee_items = COALESCE($2, fee_items),
            total_amount = COALESCE($3, total_amount),
            due_date = COALESCE($4, due_date),
            status = COALESCE($5, status),
            paid_at = CASE
                WHEN $5::fee_status IS NULL THEN paid_at
                WHEN $5 = 'Paid'::fee_status THEN COALESCE(paid_at, NOW())
                ELSE NULL
            END,
            remarks = CASE WHEN $6::TEXT IS NULL THEN remarks ELSE NULLIF($6, '') END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(items.as_ref().map(Json))
    .bind(total)
    .bind(command.due_date)
    .bind(command.status)
    .bind(command.remarks.as_deref().map(str::trim))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateFeeRecordError::NotFound(command.id))?;

    tracing::info!(fee_record_id = %record.id, total = record.total_amount, "Fee record updated");

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_edit_returns_new_total() {
        let cmd = UpdateFeeRecordCommand {
            fee_items: Some(vec![
                FeeItem {
                    fee_type: "Tuition".into(),
                    amount: 4000,
                    description: None,
                },
                FeeItem {
                    fee_type: "Library".into(),
                    amount: 150,
                    description: None,
                },
            ]),
            ..Default::default()
        };
        assert_eq!(cmd.validate().unwrap(), Some(4150));
    }

    #[test]
    fn test_status_only_keeps_total() {
        let cmd = UpdateFeeRecordCommand {
            status: Some(FeeStatus::Paid),
            ..Default::default()
        };
        assert_eq!(cmd.validate().unwrap(), None);
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(matches!(
            UpdateFeeRecordCommand::default().validate(),
            Err(UpdateFeeRecordError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_emptying_items_rejected() {
        let cmd = UpdateFeeRecordCommand {
            fee_items: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(
            cmd.validate(),
            Err(UpdateFeeRecordError::Items(FeeItemsError::Empty))
        ));
    }
}
