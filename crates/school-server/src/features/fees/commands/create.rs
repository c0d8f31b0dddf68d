//! Create fee record command
//!
//! When `feeItems` is omitted the student's fee structure is materialised
//! into line items. The total is always computed server-side.

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::features::fees::computation::{normalize_fee_items, validate_fee_items, FeeItemsError};
use crate::features::shared::validation::{
    validate_optional_length, FieldValidationError, MAX_TEXT_LENGTH,
};
use crate::models::{FeeItem, FeeRecord, FeeStatus, FeeStructure};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRecordCommand {
    pub student_id: Uuid,
    #[serde(default)]
    pub fee_items: Option<Vec<FeeItem>>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: FeeStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateFeeRecordError {
    #[error("{0}")]
    Items(#[from] FeeItemsError),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Student '{0}' not found")]
    StudentNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<FeeRecord, CreateFeeRecordError>> for CreateFeeRecordCommand {}

impl crate::cqrs::middleware::Command for CreateFeeRecordCommand {}

impl CreateFeeRecordCommand {
    pub fn validate(&self) -> Result<(), CreateFeeRecordError> {
        if let Some(ref items) = self.fee_items {
            validate_fee_items(items)?;
        }
        validate_optional_length("remarks", self.remarks.as_deref(), MAX_TEXT_LENGTH)?;
        Ok(())
    }

    /// Explicit items win; otherwise the student's structure is used
    pub fn resolve_items(&self, structure: &FeeStructure) -> Vec<FeeItem> {
        match self.fee_items {
            Some(ref items) => normalize_fee_items(items.clone()),
            None => structure.to_fee_items(),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(student_id = %command.student_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateFeeRecordCommand,
) -> Result<FeeRecord, CreateFeeRecordError> {
    command.validate()?;

    let Json(structure): Json<FeeStructure> =
        sqlx::query_scalar("SELECT fee_structure FROM students WHERE id = $1")
            .bind(command.student_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(CreateFeeRecordError::StudentNotFound(command.student_id))?;

    let items = command.resolve_items(&structure);
    let total = validate_fee_items(&items)?;

    let record = sqlx::query_as::<_, FeeRecord>(
        r#"
        INSERT INTO fee_records (student_id, fee_items, total_amount, due_date, status, paid_at, remarks)
        VALUES ($1, $2, $3, $4, $5, CASE WHEN $5::fee_status = 'Paid' THEN NOW() END, $6)
        RETURNING *
        "#,
    )
    .bind(command.student_id)
    .bind(Json(&items))
    .bind(total)
    .bind(command.due_date)
    .bind(command.status)
    .bind(command.remarks.as_deref().map(str::trim).filter(|r| !r.is_empty()))
    .fetch_one(&pool)
    .await?;

    tracing::info!(fee_record_id = %record.id, total, "Fee record created");

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(items: Option<Vec<FeeItem>>) -> CreateFeeRecordCommand {
        CreateFeeRecordCommand {
            student_id: Uuid::new_v4(),
            fee_items: items,
            due_date: NaiveDate::from_ymd_opt(2024, 10, 10).unwrap(),
            status: FeeStatus::Pending,
            remarks: None,
        }
    }

    #[test]
    fn test_omitted_items_use_student_structure() {
        let structure = FeeStructure {
            tuition: 5000,
            transport: 1200,
            ..Default::default()
        };
        let items = command(None).resolve_items(&structure);
        assert_eq!(items.len(), 2);
        assert_eq!(validate_fee_items(&items), Ok(6200));
    }

    #[test]
    fn test_explicit_items_override_structure() {
        let explicit = vec![FeeItem {
            fee_type: "Excursion".into(),
            amount: 750,
            description: Some("Museum trip".into()),
        }];
        let structure = FeeStructure {
            tuition: 5000,
            ..Default::default()
        };
        let items = command(Some(explicit)).resolve_items(&structure);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].fee_type, "Excursion");
    }

    #[test]
    fn test_empty_item_list_rejected() {
        assert!(matches!(
            command(Some(vec![])).validate(),
            Err(CreateFeeRecordError::Items(FeeItemsError::Empty))
        ));
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let cmd: CreateFeeRecordCommand = serde_json::from_value(serde_json::json!({
            "studentId": Uuid::nil(),
            "dueDate": "2024-10-10"
        }))
        .unwrap();
        assert_eq!(cmd.status, FeeStatus::Pending);
        assert!(cmd.fee_items.is_none());
    }
}
