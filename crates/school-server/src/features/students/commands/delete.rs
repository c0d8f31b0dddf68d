use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::students::enrollment::{self, EnrollmentError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStudentCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteStudentError {
    #[error("Student '{0}' not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Enrollment(#[from] EnrollmentError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteStudentResponse, DeleteStudentError>> for DeleteStudentCommand {}

impl crate::cqrs::middleware::Command for DeleteStudentCommand {}

/// Delete a student and free their seat
///
/// Attendance and fee history is kept.
#[tracing::instrument(skip(pool), fields(student_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteStudentCommand,
) -> Result<DeleteStudentResponse, DeleteStudentError> {
    let mut tx = pool.begin().await?;

    let deleted: Option<Option<Uuid>> =
        sqlx::query_scalar("DELETE FROM students WHERE id = $1 RETURNING class_id")
            .bind(command.id)
            .fetch_optional(&mut *tx)
            .await?;

    let class_id = deleted.ok_or(DeleteStudentError::NotFound(command.id))?;

    if let Some(class_id) = class_id {
        enrollment::release_seat(&mut tx, class_id).await?;
    }

    tx.commit().await?;

    tracing::info!(student_id = %command.id, "Student deleted");

    Ok(DeleteStudentResponse {
        id: command.id,
        deleted: true,
    })
}
