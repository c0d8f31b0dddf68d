use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::create::{clean_list, validate_testimonials};
use super::DuplicateTeacherField;
use crate::features::shared::error_helpers::map_unique_violation_with;
use crate::features::shared::validation::{
    validate_email, validate_non_negative, validate_required, FieldValidationError,
    MAX_NAME_LENGTH,
};
use crate::models::{Teacher, TeacherStatus, Testimonial};

/// Partial update; list fields replace the stored list when present
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub classes: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub testimonials: Option<Vec<Testimonial>>,
    pub joining_date: Option<NaiveDate>,
    pub salary: Option<i64>,
    pub status: Option<TeacherStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateTeacherError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Teacher '{0}' not found")]
    NotFound(Uuid),

    #[error("A teacher with this {0} already exists")]
    Duplicate(DuplicateTeacherField),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Teacher, UpdateTeacherError>> for UpdateTeacherCommand {}

impl crate::cqrs::middleware::Command for UpdateTeacherCommand {}

impl UpdateTeacherCommand {
    pub fn validate(&self) -> Result<(), UpdateTeacherError> {
        if let Some(ref v) = self.employee_id {
            validate_required("employeeId", v, 50)?;
        }
        if let Some(ref v) = self.first_name {
            validate_required("firstName", v, MAX_NAME_LENGTH)?;
        }
        if let Some(ref v) = self.last_name {
            validate_required("lastName", v, MAX_NAME_LENGTH)?;
        }
        if let Some(ref v) = self.email {
            validate_email("email", v)?;
        }
        if let Some(salary) = self.salary {
            validate_non_negative("salary", salary)?;
        }
        if let Some(ref testimonials) = self.testimonials {
            validate_testimonials(testimonials)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(teacher_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateTeacherCommand,
) -> Result<Teacher, UpdateTeacherError> {
    command.validate()?;

    let teacher = sqlx::query_as::<_, Teacher>(
        r#"
        UPDATE teachers
        SET employee_id = COALESCE($2, employee_id),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            email = COALESCE($5, email),
            phone = COALESCE($6, phone),
            subjects = COALESCE($7, subjects),
            classes = COALESCE($8, classes),
            qualifications = COALESCE($9, qualifications),
            skills = COALESCE($10, skills),
            testimonials = COALESCE($11, testimonials),
            joining_date = COALESCE($12, joining_date),
            salary = COALESCE($13, salary),
            status = COALESCE($14, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.employee_id.as_deref().map(str::trim))
    .bind(command.first_name.as_deref().map(str::trim))
    .bind(command.last_name.as_deref().map(str::trim))
    .bind(command.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(command.phone.as_deref().map(str::trim))
    .bind(command.subjects.as_deref().map(clean_list))
    .bind(command.classes.as_deref().map(clean_list))
    .bind(command.qualifications.as_deref().map(clean_list))
    .bind(command.skills.as_deref().map(clean_list))
    .bind(command.testimonials.as_ref().map(Json))
    .bind(command.joining_date)
    .bind(command.salary)
    .bind(command.status)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        map_unique_violation_with(
            e,
            |constraint| {
                UpdateTeacherError::Duplicate(DuplicateTeacherField::from_constraint(constraint))
            },
            UpdateTeacherError::Database,
        )
    })?
    .ok_or(UpdateTeacherError::NotFound(command.id))?;

    tracing::info!(teacher_id = %teacher.id, "Teacher updated");

    Ok(teacher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_email() {
        let cmd = UpdateTeacherCommand {
            email: Some("meera-at-school".into()),
            ..Default::default()
        };
        assert!(matches!(cmd.validate(), Err(UpdateTeacherError::Validation(_))));
    }

    #[test]
    fn test_validate_accepts_status_change() {
        let cmd = UpdateTeacherCommand {
            status: Some(TeacherStatus::OnLeave),
            ..Default::default()
        };
        assert!(cmd.validate().is_ok());
    }
}
