pub mod assign;
pub mod remove;

pub use assign::{AssignInchargeCommand, AssignInchargeError, AssignInchargeResponse};
pub use remove::{RemoveInchargeCommand, RemoveInchargeError, RemoveInchargeResponse};

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::state::{InchargeAction, InchargeState};

/// Lock the class row and read its active assignment
///
/// Returns `None` when the class does not exist.
pub(crate) async fn lock_class_state(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
) -> Result<Option<InchargeState>, sqlx::Error> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM classes WHERE id = $1 FOR UPDATE")
        .bind(class_id)
        .fetch_optional(&mut **tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let active: Option<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT teacher_id, id FROM class_incharges WHERE class_id = $1 AND is_active",
    )
    .bind(class_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(Some(InchargeState::from_active(active)))
}

/// Apply transition actions in order
pub(crate) async fn apply_actions(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
    actions: &[InchargeAction],
) -> Result<(), sqlx::Error> {
    for action in actions {
        match *action {
            InchargeAction::Deactivate { assignment_id } => {
                sqlx::query(
                    "UPDATE class_incharges SET is_active = FALSE, removed_at = NOW() WHERE id = $1",
                )
                .bind(assignment_id)
                .execute(&mut **tx)
                .await?;
            }
            InchargeAction::Insert { teacher_id } => {
                sqlx::query(
                    "INSERT INTO class_incharges (teacher_id, class_id, is_active) VALUES ($1, $2, TRUE)",
                )
                .bind(teacher_id)
                .bind(class_id)
                .execute(&mut **tx)
                .await?;
            }
            InchargeAction::SetClassIncharge(teacher_id) => {
                sqlx::query("UPDATE classes SET incharge_id = $2, updated_at = NOW() WHERE id = $1")
                    .bind(class_id)
                    .bind(teacher_id)
                    .execute(&mut **tx)
                    .await?;
            }
        }
    }

    Ok(())
}
