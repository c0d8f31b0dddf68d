use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use school_common::{types::DateRange, SchoolError};

use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{AttendanceRecord, AttendanceStatus};

/// Attendance record joined with student, class and teacher names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub student_name: Option<String>,
    pub admission_number: Option<String>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub marked_by_name: Option<String>,
}

const ATTENDANCE_DETAIL_SELECT: &str = r#"
    SELECT a.*,
           NULLIF(TRIM(CONCAT(s.first_name, ' ', s.last_name)), '') AS student_name,
           s.admission_number,
           c.name AS class_name,
           c.section,
           NULLIF(TRIM(CONCAT(t.first_name, ' ', t.last_name)), '') AS marked_by_name
    FROM attendance a
    LEFT JOIN students s ON s.id = a.student_id
    LEFT JOIN classes c ON c.id = a.class_id
    LEFT JOIN teachers t ON t.id = a.marked_by
"#;

const ATTENDANCE_FILTER_SQL: &str = r#"
    WHERE ($1::UUID IS NULL OR a.class_id = $1)
      AND ($2::UUID IS NULL OR a.student_id = $2)
      AND ($3::DATE IS NULL OR a.date >= $3)
      AND ($4::DATE IS NULL OR a.date <= $4)
      AND ($5::attendance_status IS NULL OR a.status = $5)
"#;

/// `date` selects a single day and takes precedence over `startDate`/`endDate`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAttendanceQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub class_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListAttendanceError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error("{0}")]
    InvalidRange(#[from] SchoolError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<AttendanceDetail>, ListAttendanceError>> for ListAttendanceQuery {}

impl crate::cqrs::middleware::Query for ListAttendanceQuery {}

impl ListAttendanceQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    /// Effective `(from, to)` bounds, each optional
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ListAttendanceError> {
        if let Some(date) = self.date {
            return Ok((Some(date), Some(date)));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            DateRange::new(start, end)?;
        }
        Ok((self.start_date, self.end_date))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListAttendanceQuery,
) -> Result<Paginated<AttendanceDetail>, ListAttendanceError> {
    let params = query.pagination();
    params.validate().map_err(ListAttendanceError::InvalidPagination)?;
    let (from, to) = query.bounds()?;

    let count_sql = format!("SELECT COUNT(*) FROM attendance a {ATTENDANCE_FILTER_SQL}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(query.class_id)
        .bind(query.student_id)
        .bind(from)
        .bind(to)
        .bind(query.status)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "{ATTENDANCE_DETAIL_SELECT} {ATTENDANCE_FILTER_SQL} ORDER BY a.date DESC, student_name, a.id LIMIT $6 OFFSET $7"
    );
    let items = sqlx::query_as::<_, AttendanceDetail>(&sql)
        .bind(query.class_id)
        .bind(query.student_id)
        .bind(from)
        .bind(to)
        .bind(query.status)
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
