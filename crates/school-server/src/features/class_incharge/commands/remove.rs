use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{apply_actions, lock_class_state};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInchargeCommand {
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInchargeResponse {
    pub class_id: Uuid,
    pub removed_teacher_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveInchargeError {
    #[error("Class '{0}' not found")]
    ClassNotFound(Uuid),

    #[error("Class '{0}' has no active incharge")]
    NotAssigned(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<RemoveInchargeResponse, RemoveInchargeError>> for RemoveInchargeCommand {}

impl crate::cqrs::middleware::Command for RemoveInchargeCommand {}

#[tracing::instrument(skip(pool), fields(class_id = %command.class_id))]
pub async fn handle(
    pool: PgPool,
    command: RemoveInchargeCommand,
) -> Result<RemoveInchargeResponse, RemoveInchargeError> {
    let mut tx = pool.begin().await?;

    let state = lock_class_state(&mut tx, command.class_id)
        .await?
        .ok_or(RemoveInchargeError::ClassNotFound(command.class_id))?;

    let removed_teacher_id = state
        .teacher_id()
        .ok_or(RemoveInchargeError::NotAssigned(command.class_id))?;
    let actions = state
        .remove()
        .map_err(|_| RemoveInchargeError::NotAssigned(command.class_id))?;

    apply_actions(&mut tx, command.class_id, &actions).await?;
    tx.commit().await?;

    tracing::info!(teacher_id = %removed_teacher_id, "Class incharge removed");

    Ok(RemoveInchargeResponse {
        class_id: command.class_id,
        removed_teacher_id,
    })
}
