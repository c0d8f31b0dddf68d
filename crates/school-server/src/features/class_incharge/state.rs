//! Incharge transitions
//!
//! ```text
//! Unassigned --assign(T1)--> Assigned(T1) --assign(T2)--> Assigned(T2)
//!      ^                                                      |
//!      +-------------------------remove-----------------------+
//! ```
//!
//! Assigning the teacher who already holds the class yields no actions.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InchargeState {
    Unassigned,
    Assigned { teacher_id: Uuid, assignment_id: Uuid },
}

/// One storage step, applied in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InchargeAction {
    /// Mark an assignment inactive and stamp `removed_at`
    Deactivate { assignment_id: Uuid },
    /// Insert a new active assignment
    Insert { teacher_id: Uuid },
    /// Write (or clear) the denormalised `classes.incharge_id`
    SetClassIncharge(Option<Uuid>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Class has no active incharge")]
pub struct NotAssigned;

impl InchargeState {
    pub fn from_active(active: Option<(Uuid, Uuid)>) -> Self {
        match active {
            Some((teacher_id, assignment_id)) => InchargeState::Assigned {
                teacher_id,
                assignment_id,
            },
            None => InchargeState::Unassigned,
        }
    }

    pub fn teacher_id(&self) -> Option<Uuid> {
        match self {
            InchargeState::Unassigned => None,
            InchargeState::Assigned { teacher_id, .. } => Some(*teacher_id),
        }
    }

    pub fn assign(&self, teacher_id: Uuid) -> Vec<InchargeAction> {
        match *self {
            InchargeState::Assigned {
                teacher_id: current,
                ..
            } if current == teacher_id => Vec::new(),
            InchargeState::Assigned { assignment_id, .. } => vec![
                InchargeAction::Deactivate { assignment_id },
                InchargeAction::Insert { teacher_id },
                InchargeAction::SetClassIncharge(Some(teacher_id)),
            ],
            InchargeState::Unassigned => vec![
                InchargeAction::Insert { teacher_id },
                InchargeAction::SetClassIncharge(Some(teacher_id)),
            ],
        }
    }

    pub fn remove(&self) -> Result<Vec<InchargeAction>, NotAssigned> {
        match *self {
            InchargeState::Unassigned => Err(NotAssigned),
            InchargeState::Assigned { assignment_id, .. } => Ok(vec![
                InchargeAction::Deactivate { assignment_id },
                InchargeAction::SetClassIncharge(None),
            ]),
        }
    }
}
