//! Update class command
//!
//! Partial update: omitted fields keep their stored value. Capacity cannot
//! drop below the number of students already enrolled.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    validate_optional_length, validate_positive, validate_required, FieldValidationError,
    MAX_NAME_LENGTH,
};
use crate::models::Class;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassCommand {
    #[serde(skip)]
    pub id: Uuid,
    pub name: Option<String>,
    pub section: Option<String>,
    pub capacity: Option<i32>,
    pub academic_year: Option<String>,
    pub room_number: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateClassError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("At least one field must be provided")]
    NoFieldsToUpdate,

    #[error("Class '{0}' not found")]
    NotFound(Uuid),

    #[error("Capacity {capacity} is below the {current} students already enrolled")]
    CapacityBelowEnrollment { capacity: i32, current: i32 },

    #[error("Another class with the same name, section and academic year already exists")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Class, UpdateClassError>> for UpdateClassCommand {}

impl crate::cqrs::middleware::Command for UpdateClassCommand {}

impl UpdateClassCommand {
    pub fn validate(&self) -> Result<(), UpdateClassError> {
        if self.name.is_none()
            && self.section.is_none()
            && self.capacity.is_none()
            && self.academic_year.is_none()
            && self.room_number.is_none()
        {
            return Err(UpdateClassError::NoFieldsToUpdate);
        }
        if let Some(ref name) = self.name {
            validate_required("name", name, MAX_NAME_LENGTH)?;
        }
        if let Some(ref section) = self.section {
            validate_required("section", section, 20)?;
        }
        if let Some(ref year) = self.academic_year {
            validate_required("academicYear", year, 20)?;
        }
        if let Some(capacity) = self.capacity {
            validate_positive("capacity", i64::from(capacity))?;
        }
        validate_optional_length("roomNumber", self.room_number.as_deref(), 50)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(class_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateClassCommand) -> Result<Class, UpdateClassError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current: Option<i32> =
        sqlx::query_scalar("SELECT current_students FROM classes WHERE id = $1 FOR UPDATE")
            .bind(command.id)
            .fetch_optional(&mut *tx)
            .await?;

    let current = current.ok_or(UpdateClassError::NotFound(command.id))?;

    if let Some(capacity) = command.capacity {
        if capacity < current {
            return Err(UpdateClassError::CapacityBelowEnrollment { capacity, current });
        }
    }

    let class = sqlx::query_as::<_, Class>(
        r#"
        UPDATE classes
        SET name = COALESCE($2, name),
            section = COALESCE($3, section),
            capacity = COALESCE($4, capacity),
            academic_year = COALESCE($5, academic_year),
            room_number = COALESCE($6, room_number),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(command.id)
    .bind(command.name.as_deref().map(str::trim))
    .bind(command.section.as_deref().map(str::trim))
    .bind(command.capacity)
    .bind(command.academic_year.as_deref().map(str::trim))
    .bind(command.room_number.as_deref().map(str::trim))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, UpdateClassError::Duplicate, UpdateClassError::Database))?;

    // Keep the denormalised class name on enrolled students in step
    if command.name.is_some() || command.section.is_some() {
        sqlx::query(
            "UPDATE students SET class_name = $2, section = $3, updated_at = NOW() WHERE class_id = $1",
        )
        .bind(class.id)
        .bind(&class.name)
        .bind(&class.section)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(class_id = %class.id, "Class updated");

    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_a_field() {
        let cmd = UpdateClassCommand::default();
        assert!(matches!(cmd.validate(), Err(UpdateClassError::NoFieldsToUpdate)));
    }

    #[test]
    fn test_validate_rejects_negative_capacity() {
        let cmd = UpdateClassCommand {
            capacity: Some(-5),
            ..Default::default()
        };
        assert!(matches!(cmd.validate(), Err(UpdateClassError::Validation(_))));
    }

    #[test]
    fn test_validate_room_only() {
        let cmd = UpdateClassCommand {
            room_number: Some("C-3".into()),
            ..Default::default()
        };
        assert!(cmd.validate().is_ok());
    }
}
