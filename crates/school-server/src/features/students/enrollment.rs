//! Seat accounting for class enrolment
//!
//! Callers pass an open transaction; the class row is locked with
//! `FOR UPDATE` so concurrent enrolments cannot over-fill a class.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("Class '{0}' not found")]
    ClassNotFound(Uuid),

    #[error("Class '{class_id}' is full ({capacity} students)")]
    ClassFull { class_id: Uuid, capacity: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Denormalised class fields copied onto the student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub class_id: Uuid,
    pub class_name: String,
    pub section: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ClassSeats {
    name: String,
    section: String,
    capacity: i32,
    current_students: i32,
}

/// Whether one more student fits
pub fn has_free_seat(capacity: i32, current_students: i32) -> bool {
    current_students < capacity
}

/// Lock several class rows in id order
///
/// A move touches two classes; taking both locks up front in a fixed order
/// keeps opposite moves (A to B, B to A) from deadlocking.
pub async fn lock_classes(
    tx: &mut Transaction<'_, Postgres>,
    class_ids: &[Uuid],
) -> Result<(), EnrollmentError> {
    sqlx::query("SELECT id FROM classes WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(class_ids)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Lock the class, check capacity and take one seat
pub async fn reserve_seat(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
) -> Result<Seat, EnrollmentError> {
    let class = sqlx::query_as::<_, ClassSeats>(
        "SELECT name, section, capacity, current_students FROM classes WHERE id = $1 FOR UPDATE",
    )
    .bind(class_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(EnrollmentError::ClassNotFound(class_id))?;

    if !has_free_seat(class.capacity, class.current_students) {
        return Err(EnrollmentError::ClassFull {
            class_id,
            capacity: class.capacity,
        });
    }

    sqlx::query(
        "UPDATE classes SET current_students = current_students + 1, updated_at = NOW() WHERE id = $1",
    )
    .bind(class_id)
    .execute(&mut **tx)
    .await?;

    tracing::debug!(class_id = %class_id, "Seat reserved");

    Ok(Seat {
        class_id,
        class_name: class.name,
        section: class.section,
    })
}

/// Give a seat back; a class that no longer exists is ignored
pub async fn release_seat(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Uuid,
) -> Result<(), EnrollmentError> {
    sqlx::query(
        r#"
        UPDATE classes
        SET current_students = GREATEST(current_students - 1, 0), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(class_id)
    .execute(&mut **tx)
    .await?;

    tracing::debug!(class_id = %class_id, "Seat released");

    Ok(())
}
