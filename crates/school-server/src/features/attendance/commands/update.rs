use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_optional_length, FieldValidationError, MAX_TEXT_LENGTH,
};
use crate::models::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateAttendanceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Nothing to update: provide status or remarks")]
    NoFieldsToUpdate,

    #[error("Attendance record '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AttendanceRecord, UpdateAttendanceError>> for UpdateAttendanceCommand {}

impl crate::cqrs::middleware::Command for UpdateAttendanceCommand {}

impl UpdateAttendanceCommand {
    pub fn validate(&self) -> Result<(), UpdateAttendanceError> {
        if self.status.is_none() && self.remarks.is_none() {
            return Err(UpdateAttendanceError::NoFieldsToUpdate);
        }
        validate_optional_length("remarks", self.remarks.as_deref(), MAX_TEXT_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(attendance_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateAttendanceCommand,
) -> Result<AttendanceRecord, UpdateAttendanceError> {
    command.validate()?;

    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        UPDATE attendance
        SET status = COALESCE($2, status),
            remarks = COALESCE($3, remarks),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.status)
    .bind(command.remarks.as_deref().map(str::trim))
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateAttendanceError::NotFound(command.id))
}
