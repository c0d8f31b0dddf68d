//! Class attendance report over a date range

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use school_common::{types::DateRange, SchoolError};

use crate::features::attendance::aggregation::{
    aggregate, AttendanceEntry, AttendanceReport, RosterStudent,
};
use crate::features::attendance::MAX_REPORT_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportQuery {
    pub class_id: Uuid,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAttendanceReport {
    pub class_id: Uuid,
    pub range: DateRange,
    #[serde(flatten)]
    pub report: AttendanceReport,
}

#[derive(Debug, thiserror::Error)]
pub enum AttendanceReportError {
    #[error("{0}")]
    InvalidRange(#[from] SchoolError),
    #[error("Class '{0}' not found")]
    ClassNotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ClassAttendanceReport, AttendanceReportError>> for AttendanceReportQuery {}

impl crate::cqrs::middleware::Query for AttendanceReportQuery {}

impl AttendanceReportQuery {
    pub fn range(&self, today: chrono::NaiveDate) -> Result<DateRange, AttendanceReportError> {
        let range =
            DateRange::from_query(self.start_date.as_deref(), self.end_date.as_deref(), today)?;
        range.ensure_max_days(MAX_REPORT_DAYS)?;
        Ok(range)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: AttendanceReportQuery,
) -> Result<ClassAttendanceReport, AttendanceReportError> {
    let range = query.range(Utc::now().date_naive())?;

    let class: Option<Uuid> = sqlx::query_scalar("SELECT id FROM classes WHERE id = $1")
        .bind(query.class_id)
        .fetch_optional(&pool)
        .await?;
    if class.is_none() {
        return Err(AttendanceReportError::ClassNotFound(query.class_id));
    }

    let roster_query = sqlx::query_as::<_, RosterStudent>(
        r#"
        SELECT id AS student_id, CONCAT(first_name, ' ', last_name) AS student_name
        FROM students
        WHERE class_id = $1
        "#,
    )
    .bind(query.class_id)
    .fetch_all(&pool);

    let entries_query = sqlx::query_as::<_, AttendanceEntry>(
        r#"
        SELECT a.student_id,
               COALESCE(NULLIF(TRIM(CONCAT(s.first_name, ' ', s.last_name)), ''), 'Unknown') AS student_name,
               a.date,
               a.status
        FROM attendance a
        LEFT JOIN students s ON s.id = a.student_id
        WHERE a.class_id = $1 AND a.date BETWEEN $2 AND $3
        "#,
    )
    .bind(query.class_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(&pool);

    let (roster, entries) = tokio::try_join!(roster_query, entries_query)?;

    tracing::debug!(
        students = roster.len(),
        entries = entries.len(),
        "Aggregating attendance"
    );

    Ok(ClassAttendanceReport {
        class_id: query.class_id,
        range,
        report: aggregate(&roster, &entries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()
    }

    fn query(start: Option<&str>, end: Option<&str>) -> AttendanceReportQuery {
        AttendanceReportQuery {
            class_id: Uuid::nil(),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    #[test]
    fn test_range_defaults_to_current_month() {
        let range = query(None, None).range(today()).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert!(query(Some("2024-03-10"), Some("2024-03-01"))
            .range(today())
            .is_err());
    }

    #[test]
    fn test_range_longer_than_limit_rejected() {
        assert!(query(Some("2023-01-01"), Some("2024-06-30"))
            .range(today())
            .is_err());
        assert!(query(Some("2024-01-01"), Some("2024-12-31"))
            .range(today())
            .is_ok());
    }
}
