//! Create student command

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    normalize_optional, validate_non_negative, validate_optional_email, validate_optional_length,
    validate_required, FieldValidationError, MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};
use crate::features::students::enrollment::{self, EnrollmentError};
use crate::models::{FeeStructure, Student, StudentStatus};

/// Command to admit a new student
///
/// When `classId` is given the student takes a seat in that class and the
/// class name and section are copied from it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentCommand {
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub parent_email: Option<String>,
    #[serde(default)]
    pub fee_structure: FeeStructure,
    #[serde(default)]
    pub status: StudentStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateStudentError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Student with admission number '{0}' already exists")]
    DuplicateAdmissionNumber(String),

    #[error("{0}")]
    Enrollment(#[from] EnrollmentError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Student, CreateStudentError>> for CreateStudentCommand {}

impl crate::cqrs::middleware::Command for CreateStudentCommand {}

/// Checks every fee category for a negative amount
pub(crate) fn validate_fee_structure(structure: &FeeStructure) -> Result<(), FieldValidationError> {
    validate_non_negative("feeStructure.tuition", structure.tuition)?;
    validate_non_negative("feeStructure.transport", structure.transport)?;
    validate_non_negative("feeStructure.library", structure.library)?;
    validate_non_negative("feeStructure.laboratory", structure.laboratory)?;
    validate_non_negative("feeStructure.sports", structure.sports)?;
    validate_non_negative("feeStructure.examination", structure.examination)?;
    validate_non_negative("feeStructure.miscellaneous", structure.miscellaneous)?;
    Ok(())
}

impl CreateStudentCommand {
    #[tracing::instrument(skip(self), fields(admission_number = %self.admission_number))]
    pub fn validate(&self) -> Result<(), CreateStudentError> {
        validate_required("admissionNumber", &self.admission_number, 50)?;
        validate_required("firstName", &self.first_name, MAX_NAME_LENGTH)?;
        validate_required("lastName", &self.last_name, MAX_NAME_LENGTH)?;
        validate_optional_email("email", self.email.as_deref())?;
        validate_optional_email("parentEmail", self.parent_email.as_deref())?;
        validate_optional_length("address", self.address.as_deref(), MAX_TEXT_LENGTH)?;
        validate_optional_length("parentName", self.parent_name.as_deref(), MAX_NAME_LENGTH)?;
        validate_fee_structure(&self.fee_structure)?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(admission_number = %command.admission_number, class_id = ?command.class_id)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateStudentCommand,
) -> Result<Student, CreateStudentError> {
    command.validate()?;

    let admission_number = command.admission_number.trim().to_string();

    let mut tx = pool.begin().await?;

    let seat = match command.class_id {
        Some(class_id) => Some(enrollment::reserve_seat(&mut tx, class_id).await?),
        None => None,
    };

    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (
            admission_number, first_name, last_name, email, phone, date_of_birth, gender,
            address, class_id, class_name, section, roll_number, parent_name, parent_phone,
            parent_email, fee_structure, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING *
        "#,
    )
    .bind(&admission_number)
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(normalize_optional(command.email))
    .bind(normalize_optional(command.phone))
    .bind(command.date_of_birth)
    .bind(normalize_optional(command.gender))
    .bind(normalize_optional(command.address))
    .bind(seat.as_ref().map(|s| s.class_id))
    .bind(seat.as_ref().map(|s| s.class_name.clone()))
    .bind(seat.as_ref().map(|s| s.section.clone()))
    .bind(normalize_optional(command.roll_number))
    .bind(normalize_optional(command.parent_name))
    .bind(normalize_optional(command.parent_phone))
    .bind(normalize_optional(command.parent_email))
    .bind(Json(command.fee_structure))
    .bind(command.status)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateStudentError::DuplicateAdmissionNumber(admission_number.clone()),
            CreateStudentError::Database,
        )
    })?;

    tx.commit().await?;

    tracing::info!(student_id = %student.id, "Student created");

    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateStudentCommand {
        CreateStudentCommand {
            admission_number: "ADM-2024-001".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            parent_email: Some("parent@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parent_email() {
        let cmd = CreateStudentCommand {
            parent_email: Some("not-an-email".to_string()),
            ..command()
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateStudentError::Validation(FieldValidationError::InvalidEmail {
                field: "parentEmail"
            }))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_fee() {
        let cmd = CreateStudentCommand {
            fee_structure: FeeStructure {
                transport: -100,
                ..Default::default()
            },
            ..command()
        };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_defaults_when_deserializing() {
        let cmd: CreateStudentCommand = serde_json::from_str(
            r#"{"admissionNumber":"A1","firstName":"Ravi","lastName":"K","feeStructure":{"tuition":1500}}"#,
        )
        .unwrap();
        assert_eq!(cmd.status, StudentStatus::Active);
        assert_eq!(cmd.fee_structure.tuition, 1500);
        assert!(cmd.class_id.is_none());
    }
}
