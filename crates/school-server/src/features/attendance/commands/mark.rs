//! Mark attendance for a class on one day
//!
//! Only the class's active incharge may mark. Entries upsert on
//! `(student_id, date)`, so re-marking a day overwrites the earlier status.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_optional_length, FieldValidationError, MAX_TEXT_LENGTH,
};
use crate::models::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceCommand {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub marked_by: Uuid,
    pub records: Vec<MarkEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponse {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub marked: usize,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum MarkAttendanceError {
    #[error("At least one attendance record is required")]
    NoRecords,

    #[error("Student '{0}' appears more than once")]
    DuplicateStudent(Uuid),

    #[error("Cannot mark attendance for a future date ({0})")]
    FutureDate(NaiveDate),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldValidationError),

    #[error("Class '{0}' not found")]
    ClassNotFound(Uuid),

    #[error("Teacher '{teacher_id}' is not the active incharge of class '{class_id}'")]
    NotIncharge { teacher_id: Uuid, class_id: Uuid },

    #[error("Student '{0}' is not enrolled in this class")]
    NotEnrolled(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<MarkAttendanceResponse, MarkAttendanceError>> for MarkAttendanceCommand {}

impl crate::cqrs::middleware::Command for MarkAttendanceCommand {}

impl MarkAttendanceCommand {
    /// Checks that need no database access; `today` is the server's UTC date
    pub fn validate(&self, today: NaiveDate) -> Result<(), MarkAttendanceError> {
        if self.records.is_empty() {
            return Err(MarkAttendanceError::NoRecords);
        }
        if self.date > today {
            return Err(MarkAttendanceError::FutureDate(self.date));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for entry in &self.records {
            if !seen.insert(entry.student_id) {
                return Err(MarkAttendanceError::DuplicateStudent(entry.student_id));
            }
            validate_optional_length("remarks", entry.remarks.as_deref(), MAX_TEXT_LENGTH)?;
        }
        Ok(())
    }

    fn student_ids(&self) -> Vec<Uuid> {
        self.records.iter().map(|r| r.student_id).collect()
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(class_id = %command.class_id, date = %command.date, count = command.records.len())
)]
pub async fn handle(
    pool: PgPool,
    command: MarkAttendanceCommand,
) -> Result<MarkAttendanceResponse, MarkAttendanceError> {
    command.validate(Utc::now().date_naive())?;

    let mut tx = pool.begin().await?;

    let class: Option<Uuid> = sqlx::query_scalar("SELECT id FROM classes WHERE id = $1")
        .bind(command.class_id)
        .fetch_optional(&mut *tx)
        .await?;
    if class.is_none() {
        return Err(MarkAttendanceError::ClassNotFound(command.class_id));
    }

    let is_incharge: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM class_incharges
            WHERE class_id = $1 AND teacher_id = $2 AND is_active
        )
        "#,
    )
    .bind(command.class_id)
    .bind(command.marked_by)
    .fetch_one(&mut *tx)
    .await?;

    if !is_incharge {
        tracing::warn!(teacher_id = %command.marked_by, "Attendance rejected: not the class incharge");
        return Err(MarkAttendanceError::NotIncharge {
            teacher_id: command.marked_by,
            class_id: command.class_id,
        });
    }

    let enrolled: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM students WHERE class_id = $1 AND id = ANY($2)")
            .bind(command.class_id)
            .bind(command.student_ids())
            .fetch_all(&mut *tx)
            .await?;
    let enrolled: HashSet<Uuid> = enrolled.into_iter().collect();
    if let Some(entry) = command.records.iter().find(|r| !enrolled.contains(&r.student_id)) {
        return Err(MarkAttendanceError::NotEnrolled(entry.student_id));
    }

    let mut records = Vec::with_capacity(command.records.len());
    for entry in &command.records {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance (student_id, class_id, date, status, marked_by, remarks)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id, date) DO UPDATE
            SET class_id = EXCLUDED.class_id,
                status = EXCLUDED.status,
                marked_by = EXCLUDED.marked_by,
                remarks = EXCLUDED.remarks,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(entry.student_id)
        .bind(command.class_id)
        .bind(command.date)
        .bind(entry.status)
        .bind(command.marked_by)
        .bind(entry.remarks.as_deref().map(str::trim).filter(|r| !r.is_empty()))
        .fetch_one(&mut *tx)
        .await?;
        records.push(record);
    }

    tx.commit().await?;

    tracing::info!(marked = records.len(), "Attendance marked");

    Ok(MarkAttendanceResponse {
        class_id: command.class_id,
        date: command.date,
        marked: records.len(),
        records,
    })
}
