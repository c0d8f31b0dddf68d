//! Assign a teacher as class incharge

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{apply_actions, lock_class_state};
use crate::features::shared::error_helpers::is_unique_violation;
use crate::models::{ClassIncharge, TeacherStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInchargeCommand {
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInchargeResponse {
    pub assignment: ClassIncharge,
    pub previous_teacher_id: Option<Uuid>,
    /// False when the teacher already held the class
    pub changed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignInchargeError {
    #[error("Teacher '{0}' not found")]
    TeacherNotFound(Uuid),

    #[error("Teacher '{0}' is not active")]
    TeacherNotActive(Uuid),

    #[error("Class '{0}' not found")]
    ClassNotFound(Uuid),

    #[error("Class '{0}' was assigned concurrently; retry")]
    Conflict(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AssignInchargeResponse, AssignInchargeError>> for AssignInchargeCommand {}

impl crate::cqrs::middleware::Command for AssignInchargeCommand {}

#[tracing::instrument(skip(pool), fields(class_id = %command.class_id, teacher_id = %command.teacher_id))]
pub async fn handle(
    pool: PgPool,
    command: AssignInchargeCommand,
) -> Result<AssignInchargeResponse, AssignInchargeError> {
    let mut tx = pool.begin().await?;

    let status: TeacherStatus = sqlx::query_scalar("SELECT status FROM teachers WHERE id = $1")
        .bind(command.teacher_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AssignInchargeError::TeacherNotFound(command.teacher_id))?;
    if status != TeacherStatus::Active {
        return Err(AssignInchargeError::TeacherNotActive(command.teacher_id));
    }

    let state = lock_class_state(&mut tx, command.class_id)
        .await?
        .ok_or(AssignInchargeError::ClassNotFound(command.class_id))?;

    let actions = state.assign(command.teacher_id);
    let changed = !actions.is_empty();

    apply_actions(&mut tx, command.class_id, &actions)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AssignInchargeError::Conflict(command.class_id)
            } else {
                AssignInchargeError::Database(e)
            }
        })?;

    let assignment = sqlx::query_as::<_, ClassIncharge>(
        "SELECT * FROM class_incharges WHERE class_id = $1 AND is_active",
    )
    .bind(command.class_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    if changed {
        tracing::info!(
            assignment_id = %assignment.id,
            previous_teacher_id = ?state.teacher_id(),
            "Class incharge assigned"
        );
    } else {
        tracing::debug!("Teacher already holds the class");
    }

    Ok(AssignInchargeResponse {
        assignment,
        previous_teacher_id: state.teacher_id(),
        changed,
    })
}
