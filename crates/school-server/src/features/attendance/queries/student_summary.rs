//! One student's attendance counts and rate over a date range

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use school_common::{types::DateRange, SchoolError};

use crate::features::attendance::aggregation::{StatusCounts, StudentAttendance};
use crate::features::attendance::MAX_REPORT_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummaryQuery {
    #[serde(skip)]
    pub student_id: Uuid,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub range: DateRange,
    #[serde(flatten)]
    pub attendance: StudentAttendance,
}

#[derive(Debug, thiserror::Error)]
pub enum StudentSummaryError {
    #[error("{0}")]
    InvalidRange(#[from] SchoolError),
    #[error("Student '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<StudentSummary, StudentSummaryError>> for StudentSummaryQuery {}

impl crate::cqrs::middleware::Query for StudentSummaryQuery {}

#[derive(Debug, sqlx::FromRow)]
struct CountsRow {
    present: i64,
    late: i64,
    absent: i64,
}

/// Count a student's records in `range`
///
/// Shared with the student overview; the caller has already resolved the
/// student's display name.
pub async fn summarize_student(
    pool: &PgPool,
    student_id: Uuid,
    student_name: &str,
    range: DateRange,
) -> Result<StudentAttendance, sqlx::Error> {
    let row = sqlx::query_as::<_, CountsRow>(
        r#"
        SELECT COUNT(*) FILTER (WHERE status = 'Present') AS present,
               COUNT(*) FILTER (WHERE status = 'Late') AS late,
               COUNT(*) FILTER (WHERE status = 'Absent') AS absent
        FROM attendance
        WHERE student_id = $1 AND date BETWEEN $2 AND $3
        "#,
    )
    .bind(student_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_one(pool)
    .await?;

    let counts = StatusCounts {
        present: row.present,
        late: row.late,
        absent: row.absent,
        total: row.present + row.late + row.absent,
    };

    Ok(StudentAttendance::new(student_id, student_name.to_string(), counts))
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: StudentSummaryQuery,
) -> Result<StudentSummary, StudentSummaryError> {
    let range = DateRange::from_query(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        Utc::now().date_naive(),
    )?;
    range.ensure_max_days(MAX_REPORT_DAYS)?;

    let name: String = sqlx::query_scalar(
        "SELECT CONCAT(first_name, ' ', last_name) FROM students WHERE id = $1",
    )
    .bind(query.student_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(StudentSummaryError::NotFound(query.student_id))?;

    let attendance = summarize_student(&pool, query.student_id, &name, range).await?;

    Ok(StudentSummary { range, attendance })
}
