use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAttendanceCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttendanceResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAttendanceError {
    #[error("Attendance record '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteAttendanceResponse, DeleteAttendanceError>> for DeleteAttendanceCommand {}

impl crate::cqrs::middleware::Command for DeleteAttendanceCommand {}

#[tracing::instrument(skip(pool), fields(attendance_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteAttendanceCommand,
) -> Result<DeleteAttendanceResponse, DeleteAttendanceError> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteAttendanceError::NotFound(command.id));
    }

    Ok(DeleteAttendanceResponse {
        id: command.id,
        deleted: true,
    })
}
