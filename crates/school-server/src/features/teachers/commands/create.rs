//! Create teacher command

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};

use super::DuplicateTeacherField;
use crate::features::shared::error_helpers::map_unique_violation_with;
use crate::features::shared::validation::{
    normalize_optional, validate_email, validate_non_negative, validate_required,
    FieldValidationError, MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};
use crate::models::{Teacher, TeacherStatus, Testimonial};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherCommand {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub status: TeacherStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateTeacherError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("A teacher with this {0} already exists")]
    Duplicate(DuplicateTeacherField),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Teacher, CreateTeacherError>> for CreateTeacherCommand {}

impl crate::cqrs::middleware::Command for CreateTeacherCommand {}

/// Trim entries and drop blanks from a tag list such as subjects
pub(crate) fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub(crate) fn validate_testimonials(items: &[Testimonial]) -> Result<(), FieldValidationError> {
    for item in items {
        validate_required("testimonials.author", &item.author, MAX_NAME_LENGTH)?;
        validate_required("testimonials.content", &item.content, MAX_TEXT_LENGTH)?;
    }
    Ok(())
}

impl CreateTeacherCommand {
    #[tracing::instrument(skip(self), fields(employee_id = %self.employee_id))]
    pub fn validate(&self) -> Result<(), CreateTeacherError> {
        validate_required("employeeId", &self.employee_id, 50)?;
        validate_required("firstName", &self.first_name, MAX_NAME_LENGTH)?;
        validate_required("lastName", &self.last_name, MAX_NAME_LENGTH)?;
        validate_email("email", &self.email)?;
        if let Some(salary) = self.salary {
            validate_non_negative("salary", salary)?;
        }
        validate_testimonials(&self.testimonials)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(employee_id = %command.employee_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateTeacherCommand,
) -> Result<Teacher, CreateTeacherError> {
    command.validate()?;

    let teacher = sqlx::query_as::<_, Teacher>(
        r#"
        INSERT INTO teachers (
            employee_id, first_name, last_name, email, phone, subjects, classes,
            qualifications, skills, testimonials, joining_date, salary, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(command.employee_id.trim())
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(command.email.trim().to_lowercase())
    .bind(normalize_optional(command.phone.clone()))
    .bind(clean_list(&command.subjects))
    .bind(clean_list(&command.classes))
    .bind(clean_list(&command.qualifications))
    .bind(clean_list(&command.skills))
    .bind(Json(&command.testimonials))
    .bind(command.joining_date)
    .bind(command.salary)
    .bind(command.status)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation_with(
            e,
            |constraint| {
                CreateTeacherError::Duplicate(DuplicateTeacherField::from_constraint(constraint))
            },
            CreateTeacherError::Database,
        )
    })?;

    tracing::info!(teacher_id = %teacher.id, "Teacher created");

    Ok(teacher)
}
