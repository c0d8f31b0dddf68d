//! Headline numbers for the admin dashboard
//!
//! Each figure is an independent query; they run concurrently on the pool.

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attendance::aggregation::{attendance_rate, StatusCounts};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsQuery {
    /// Day for the attendance figures; defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendance {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeeTotals {
    pub pending_count: i64,
    pub pending_amount: i64,
    pub overdue_count: i64,
    pub overdue_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_students: i64,
    pub total_students: i64,
    pub active_teachers: i64,
    pub total_teachers: i64,
    pub total_classes: i64,
    pub attendance: TodayAttendance,
    pub fees: FeeTotals,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardStatsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DashboardStats, DashboardStatsError>> for DashboardStatsQuery {}

impl crate::cqrs::middleware::Query for DashboardStatsQuery {}

#[derive(Debug, sqlx::FromRow)]
struct PeopleCounts {
    active: i64,
    total: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct AttendanceCounts {
    present: i64,
    late: i64,
    absent: i64,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: DashboardStatsQuery,
) -> Result<DashboardStats, DashboardStatsError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let students = sqlx::query_as::<_, PeopleCounts>(
        "SELECT COUNT(*) FILTER (WHERE status = 'Active') AS active, COUNT(*) AS total FROM students",
    )
    .fetch_one(&pool);

    let teachers = sqlx::query_as::<_, PeopleCounts>(
        "SELECT COUNT(*) FILTER (WHERE status = 'Active') AS active, COUNT(*) AS total FROM teachers",
    )
    .fetch_one(&pool);

    let classes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes").fetch_one(&pool);

    let attendance = sqlx::query_as::<_, AttendanceCounts>(
        r#"
        SELECT COUNT(*) FILTER (WHERE status = 'Present') AS present,
               COUNT(*) FILTER (WHERE status = 'Late') AS late,
               COUNT(*) FILTER (WHERE status = 'Absent') AS absent
        FROM attendance
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_one(&pool);

    let fees = sqlx::query_as::<_, FeeTotals>(
        r#"
        SELECT COUNT(*) FILTER (WHERE status = 'Pending') AS pending_count,
               COALESCE(SUM(total_amount) FILTER (WHERE status = 'Pending'), 0)::BIGINT AS pending_amount,
               COUNT(*) FILTER (WHERE status = 'Overdue') AS overdue_count,
               COALESCE(SUM(total_amount) FILTER (WHERE status = 'Overdue'), 0)::BIGINT AS overdue_amount
        FROM fee_records
        "#,
    )
    .fetch_one(&pool);

    let (students, teachers, total_classes, attendance, fees) =
        tokio::try_join!(students, teachers, classes, attendance, fees)?;

    let counts = StatusCounts {
        present: attendance.present,
        late: attendance.late,
        absent: attendance.absent,
        total: attendance.present + attendance.late + attendance.absent,
    };

    Ok(DashboardStats {
        active_students: students.active,
        total_students: students.total,
        active_teachers: teachers.active,
        total_teachers: teachers.total,
        total_classes,
        attendance: TodayAttendance {
            date,
            attendance_rate: attendance_rate(counts.present, counts.late, counts.total),
            counts,
        },
        fees,
    })
}
