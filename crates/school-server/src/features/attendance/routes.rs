//! Attendance API routes
//!
//! - `POST /api/attendance` - Mark a class for one day (incharge only)
//! - `GET /api/attendance` - List records (`classId`, `studentId`, `date`, `startDate`, `endDate`, `status`)
//! - `GET /api/attendance/report` - Class report (`classId`, `startDate`, `endDate`)
//! - `GET /api/attendance/students/:id/summary` - One student's counts and rate
//! - `PUT /api/attendance/:id` - Change status or remarks
//! - `DELETE /api/attendance/:id` - Delete a record

use axum::{
    extract::State,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{created, ok, ok_page, ApiJson, ApiPath, ApiQuery, ApiResult, AppError};

use super::{
    commands::{
        DeleteAttendanceCommand, DeleteAttendanceError, MarkAttendanceCommand, MarkAttendanceError,
        UpdateAttendanceCommand, UpdateAttendanceError,
    },
    queries::{
        AttendanceReportError, AttendanceReportQuery, ListAttendanceError, ListAttendanceQuery,
        StudentSummaryError, StudentSummaryQuery,
    },
};

pub fn attendance_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(mark_attendance).get(list_attendance))
        .route("/report", get(attendance_report))
        .route("/students/:id/summary", get(student_summary))
        .route("/:id", put(update_attendance).delete(delete_attendance))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, command), fields(class_id = %command.class_id))]
async fn mark_attendance(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<MarkAttendanceCommand>,
) -> ApiResult<Response> {
    let response = super::commands::mark::handle(pool, command).await?;
    Ok(created(response))
}

#[tracing::instrument(skip(pool, command))]
async fn update_attendance(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut command): ApiJson<UpdateAttendanceCommand>,
) -> ApiResult<Response> {
    command.id = id;
    let record = super::commands::update::handle(pool, command).await?;
    Ok(ok(record))
}

#[tracing::instrument(skip(pool))]
async fn delete_attendance(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteAttendanceCommand { id }).await?;
    Ok(ok(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_attendance(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListAttendanceQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;
    Ok(ok_page(page))
}

#[tracing::instrument(skip(pool))]
async fn attendance_report(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<AttendanceReportQuery>,
) -> ApiResult<Response> {
    let report = super::queries::report::handle(pool, query).await?;
    Ok(ok(report))
}

#[tracing::instrument(skip(pool, query))]
async fn student_summary(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(mut query): ApiQuery<StudentSummaryQuery>,
) -> ApiResult<Response> {
    query.student_id = id;
    let summary = super::queries::student_summary::handle(pool, query).await?;
    Ok(ok(summary))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<MarkAttendanceError> for AppError {
    fn from(err: MarkAttendanceError) -> Self {
        match err {
            MarkAttendanceError::NoRecords
            | MarkAttendanceError::DuplicateStudent(_)
            | MarkAttendanceError::FutureDate(_)
            | MarkAttendanceError::Validation(_)
            | MarkAttendanceError::NotEnrolled(_) => AppError::Validation(err.to_string()),
            MarkAttendanceError::ClassNotFound(_) => AppError::NotFound(err.to_string()),
            MarkAttendanceError::NotIncharge { .. } => AppError::Forbidden(err.to_string()),
            MarkAttendanceError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateAttendanceError> for AppError {
    fn from(err: UpdateAttendanceError) -> Self {
        match err {
            UpdateAttendanceError::Validation(_) | UpdateAttendanceError::NoFieldsToUpdate => {
                AppError::Validation(err.to_string())
            }
            UpdateAttendanceError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateAttendanceError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteAttendanceError> for AppError {
    fn from(err: DeleteAttendanceError) -> Self {
        match err {
            DeleteAttendanceError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteAttendanceError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListAttendanceError> for AppError {
    fn from(err: ListAttendanceError) -> Self {
        match err {
            ListAttendanceError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListAttendanceError::InvalidRange(e) => e.into(),
            ListAttendanceError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AttendanceReportError> for AppError {
    fn from(err: AttendanceReportError) -> Self {
        match err {
            AttendanceReportError::InvalidRange(e) => e.into(),
            AttendanceReportError::ClassNotFound(_) => AppError::NotFound(err.to_string()),
            AttendanceReportError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<StudentSummaryError> for AppError {
    fn from(err: StudentSummaryError) -> Self {
        match err {
            StudentSummaryError::InvalidRange(e) => e.into(),
            StudentSummaryError::NotFound(_) => AppError::NotFound(err.to_string()),
            StudentSummaryError::Database(e) => AppError::Database(e),
        }
    }
}
