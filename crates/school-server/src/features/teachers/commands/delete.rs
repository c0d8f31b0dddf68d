//! Delete teacher command
//!
//! A teacher who is the active incharge of a class must be unassigned first.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTeacherCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTeacherResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteTeacherError {
    #[error("Teacher '{0}' not found")]
    NotFound(Uuid),

    #[error("Teacher is the active incharge of {0} class(es); remove the assignment first")]
    ActiveIncharge(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteTeacherResponse, DeleteTeacherError>> for DeleteTeacherCommand {}

impl crate::cqrs::middleware::Command for DeleteTeacherCommand {}

#[tracing::instrument(skip(pool), fields(teacher_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteTeacherCommand,
) -> Result<DeleteTeacherResponse, DeleteTeacherError> {
    let mut tx = pool.begin().await?;

    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM teachers WHERE id = $1 FOR UPDATE")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        return Err(DeleteTeacherError::NotFound(command.id));
    }

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM class_incharges WHERE teacher_id = $1 AND is_active",
    )
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await?;

    if active > 0 {
        return Err(DeleteTeacherError::ActiveIncharge(active));
    }

    sqlx::query("DELETE FROM teachers WHERE id = $1")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(teacher_id = %command.id, "Teacher deleted");

    Ok(DeleteTeacherResponse {
        id: command.id,
        deleted: true,
    })
}
