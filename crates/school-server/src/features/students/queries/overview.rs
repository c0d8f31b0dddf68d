//! Parent-portal view of one student
//!
//! Combines the student record, their attendance summary for a date range
//! (the current month by default) and the fees still owed.

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use school_common::{types::DateRange, SchoolError};

use crate::features::attendance::aggregation::StudentAttendance;
use crate::features::attendance::queries::student_summary::summarize_student;
use crate::features::fees::queries::outstanding::{outstanding_for_student, OutstandingFees};
use crate::models::Student;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverviewQuery {
    #[serde(skip)]
    pub student_id: Uuid,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverview {
    pub student: Student,
    pub range: DateRange,
    pub attendance: StudentAttendance,
    pub outstanding_fees: OutstandingFees,
}

#[derive(Debug, thiserror::Error)]
pub enum StudentOverviewError {
    #[error("{0}")]
    InvalidRange(#[from] SchoolError),
    #[error("Student '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<StudentOverview, StudentOverviewError>> for StudentOverviewQuery {}

impl crate::cqrs::middleware::Query for StudentOverviewQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: StudentOverviewQuery,
) -> Result<StudentOverview, StudentOverviewError> {
    let range = DateRange::from_query(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        Utc::now().date_naive(),
    )?;
    range.ensure_max_days(crate::features::attendance::MAX_REPORT_DAYS)?;

    let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
        .bind(query.student_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(StudentOverviewError::NotFound(query.student_id))?;

    let name = student.full_name();
    let (attendance, outstanding_fees) = tokio::try_join!(
        summarize_student(&pool, student.id, &name, range),
        outstanding_for_student(&pool, student.id),
    )?;

    Ok(StudentOverview {
        student,
        range,
        attendance,
        outstanding_fees,
    })
}
