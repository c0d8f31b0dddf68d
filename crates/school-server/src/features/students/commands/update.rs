//! Update student command
//!
//! Omitted fields keep their stored value. Changing `classId` releases the
//! seat in the old class and reserves one in the new class.

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::create::validate_fee_structure;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    validate_optional_email, validate_optional_length, validate_required, FieldValidationError,
    MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};
use crate::features::students::enrollment::{self, EnrollmentError};
use crate::models::{FeeStructure, Student, StudentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub admission_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub class_id: Option<Uuid>,
    pub roll_number: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub fee_structure: Option<FeeStructure>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateStudentError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Student '{0}' not found")]
    NotFound(Uuid),

    #[error("Admission number is already used by another student")]
    DuplicateAdmissionNumber,

    #[error("{0}")]
    Enrollment(#[from] EnrollmentError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Student, UpdateStudentError>> for UpdateStudentCommand {}

impl crate::cqrs::middleware::Command for UpdateStudentCommand {}

impl UpdateStudentCommand {
    pub fn validate(&self) -> Result<(), UpdateStudentError> {
        if let Some(ref v) = self.admission_number {
            validate_required("admissionNumber", v, 50)?;
        }
        if let Some(ref v) = self.first_name {
            validate_required("firstName", v, MAX_NAME_LENGTH)?;
        }
        if let Some(ref v) = self.last_name {
            validate_required("lastName", v, MAX_NAME_LENGTH)?;
        }
        validate_optional_email("email", self.email.as_deref())?;
        validate_optional_email("parentEmail", self.parent_email.as_deref())?;
        validate_optional_length("address", self.address.as_deref(), MAX_TEXT_LENGTH)?;
        if let Some(ref structure) = self.fee_structure {
            validate_fee_structure(structure)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(student_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateStudentCommand,
) -> Result<Student, UpdateStudentError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let existing: Option<Option<Uuid>> =
        sqlx::query_scalar("SELECT class_id FROM students WHERE id = $1 FOR UPDATE")
            .bind(command.id)
            .fetch_optional(&mut *tx)
            .await?;

    let current_class = existing.ok_or(UpdateStudentError::NotFound(command.id))?;

    let seat = match command.class_id {
        Some(new_class) if Some(new_class) != current_class => {
            if let Some(old_class) = current_class {
                enrollment::lock_classes(&mut tx, &[old_class, new_class]).await?;
                enrollment::release_seat(&mut tx, old_class).await?;
            }
            Some(enrollment::reserve_seat(&mut tx, new_class).await?)
        },
        _ => None,
    };

    let student = sqlx::query_as::<_, Student>(
        r#"
        UPDATE students
        SET admission_number = COALESCE($2, admission_number),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            email = COALESCE($5, email),
            phone = COALESCE($6, phone),
            date_of_birth = COALESCE($7, date_of_birth),
            gender = COALESCE($8, gender),
            address = COALESCE($9, address),
            class_id = COALESCE($10, class_id),
            class_name = COALESCE($11, class_name),
            section = COALESCE($12, section),
            roll_number = COALESCE($13, roll_number),
            parent_name = COALESCE($14, parent_name),
            parent_phone = COALESCE($15, parent_phone),
            parent_email = COALESCE($16, parent_email),
            fee_structure = COALESCE($17, fee_structure),
            status = COALESCE($18, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.admission_number.as_deref().map(str::trim))
    .bind(command.first_name.as_deref().map(str::trim))
    .bind(command.last_name.as_deref().map(str::trim))
    .bind(command.email.as_deref().map(str::trim))
    .bind(command.phone.as_deref().map(str::trim))
    .bind(command.date_of_birth)
    .bind(command.gender.as_deref())
    .bind(command.address.as_deref())
    .bind(seat.as_ref().map(|s| s.class_id))
    .bind(seat.as_ref().map(|s| s.class_name.as_str()))
    .bind(seat.as_ref().map(|s| s.section.as_str()))
    .bind(command.roll_number.as_deref())
    .bind(command.parent_name.as_deref())
    .bind(command.parent_phone.as_deref())
    .bind(command.parent_email.as_deref().map(str::trim))
    .bind(command.fee_structure.clone().map(Json))
    .bind(command.status)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateStudentError::DuplicateAdmissionNumber,
            UpdateStudentError::Database,
        )
    })?;

    tx.commit().await?;

    tracing::info!(student_id = %student.id, moved = seat.is_some(), "Student updated");

    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateStudentCommand::default().validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let cmd = UpdateStudentCommand {
            first_name: Some("".into()),
            ..Default::default()
        };
        assert!(matches!(cmd.validate(), Err(UpdateStudentError::Validation(_))));
    }

    #[test]
    fn test_status_deserializes() {
        let cmd: UpdateStudentCommand =
            serde_json::from_str(r#"{"status":"Graduated"}"#).unwrap();
        assert_eq!(cmd.status, Some(StudentStatus::Graduated));
    }
}
