//! Create class command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    normalize_optional, validate_optional_length, validate_positive, validate_required,
    FieldValidationError, MAX_NAME_LENGTH,
};
use crate::models::Class;

/// Command to create a new class
///
/// ```rust,ignore
/// let command = CreateClassCommand {
///     name: "Grade 5".to_string(),
///     section: "A".to_string(),
///     capacity: 40,
///     academic_year: "2024-2025".to_string(),
///     room_number: Some("B-12".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassCommand {
    pub name: String,
    pub section: String,
    pub capacity: i32,
    pub academic_year: String,
    #[serde(default)]
    pub room_number: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateClassError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Class '{name} {section}' already exists for academic year {academic_year}")]
    Duplicate {
        name: String,
        section: String,
        academic_year: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Class, CreateClassError>> for CreateClassCommand {}

impl crate::cqrs::middleware::Command for CreateClassCommand {}

impl CreateClassCommand {
    pub fn validate(&self) -> Result<(), CreateClassError> {
        validate_required("name", &self.name, MAX_NAME_LENGTH)?;
        validate_required("section", &self.section, 20)?;
        validate_required("academicYear", &self.academic_year, 20)?;
        validate_positive("capacity", i64::from(self.capacity))?;
        validate_optional_length("roomNumber", self.room_number.as_deref(), 50)?;
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(name = %command.name, section = %command.section, academic_year = %command.academic_year)
)]
pub async fn handle(pool: PgPool, command: CreateClassCommand) -> Result<Class, CreateClassError> {
    command.validate()?;

    let name = command.name.trim().to_string();
    let section = command.section.trim().to_string();
    let academic_year = command.academic_year.trim().to_string();

    let class = sqlx::query_as::<_, Class>(
        r#"
        INSERT INTO classes (name, section, capacity, academic_year, room_number)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&name)
    .bind(&section)
    .bind(command.capacity)
    .bind(&academic_year)
    .bind(normalize_optional(command.room_number))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateClassError::Duplicate {
                name: name.clone(),
                section: section.clone(),
                academic_year: academic_year.clone(),
            },
            CreateClassError::Database,
        )
    })?;

    tracing::info!(class_id = %class.id, "Class created");

    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateClassCommand {
        CreateClassCommand {
            name: "Grade 5".to_string(),
            section: "A".to_string(),
            capacity: 40,
            academic_year: "2024-2025".to_string(),
            room_number: None,
        }
    }

    #[test]
    fn test_validate_success() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let cmd = CreateClassCommand {
            capacity: 0,
            ..command()
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateClassError::Validation(FieldValidationError::NotPositive {
                field: "capacity"
            }))
        ));
    }

    #[test]
    fn test_validate_requires_section() {
        let cmd = CreateClassCommand {
            section: " ".to_string(),
            ..command()
        };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case() {
        let cmd: CreateClassCommand = serde_json::from_str(
            r#"{"name":"Grade 1","section":"B","capacity":30,"academicYear":"2025-2026"}"#,
        )
        .unwrap();
        assert_eq!(cmd.academic_year, "2025-2026");
        assert!(cmd.room_number.is_none());
    }
}
