//! Delete class command
//!
//! A class that still has enrolled students cannot be deleted. Any active
//! incharge assignment is closed in the same transaction.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClassCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClassResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteClassError {
    #[error("Class '{0}' not found")]
    NotFound(Uuid),

    #[error("Cannot delete class with {0} enrolled students")]
    HasStudents(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteClassResponse, DeleteClassError>> for DeleteClassCommand {}

impl crate::cqrs::middleware::Command for DeleteClassCommand {}

/// Whether a class with `current_students` enrolled may be removed
pub fn can_delete(current_students: i32) -> Result<(), DeleteClassError> {
    if current_students > 0 {
        return Err(DeleteClassError::HasStudents(current_students));
    }
    Ok(())
}

#[tracing::instrument(skip(pool), fields(class_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteClassCommand,
) -> Result<DeleteClassResponse, DeleteClassError> {
    let mut tx = pool.begin().await?;

    let current: Option<i32> =
        sqlx::query_scalar("SELECT current_students FROM classes WHERE id = $1 FOR UPDATE")
            .bind(command.id)
            .fetch_optional(&mut *tx)
            .await?;

    let current = current.ok_or(DeleteClassError::NotFound(command.id))?;
    can_delete(current)?;

    sqlx::query(
        "UPDATE class_incharges SET is_active = FALSE, removed_at = NOW() WHERE class_id = $1 AND is_active",
    )
    .bind(command.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM classes WHERE id = $1")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(class_id = %command.id, "Class deleted");

    Ok(DeleteClassResponse {
        id: command.id,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_delete_empty_class() {
        assert!(can_delete(0).is_ok());
    }

    #[test]
    fn test_cannot_delete_class_with_students() {
        let err = can_delete(3).unwrap_err();
        assert!(matches!(err, DeleteClassError::HasStudents(3)));
        assert_eq!(err.to_string(), "Cannot delete class with 3 enrolled students");
    }
}
