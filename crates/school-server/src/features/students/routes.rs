//! Student API routes
//!
//! - `POST /api/students` - Admit a student
//! - `GET /api/students` - List students (`search`, `classId`, `status`, `page`, `perPage`)
//! - `GET /api/students/export` - Same filters, as CSV
//! - `GET /api/students/:id` - Get a student
//! - `GET /api/students/:id/overview` - Student, attendance summary and outstanding fees
//! - `PUT /api/students/:id` - Update a student
//! - `DELETE /api/students/:id` - Delete a student

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{created, ok, ok_page, ApiJson, ApiPath, ApiQuery, ApiResult, AppError};
use crate::features::shared::export::csv_response;
use crate::features::students::enrollment::EnrollmentError;

use super::{
    commands::{
        CreateStudentCommand, CreateStudentError, DeleteStudentCommand, DeleteStudentError,
        UpdateStudentCommand, UpdateStudentError,
    },
    queries::{
        export::ExportStudentsError, GetStudentError, GetStudentQuery, ListStudentsError,
        ListStudentsQuery, StudentFilter, StudentOverviewError, StudentOverviewQuery,
    },
};

pub fn students_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_student).get(list_students))
        .route("/export", get(export_students))
        .route("/:id", get(get_student).put(update_student).delete(delete_student))
        .route("/:id/overview", get(student_overview))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, command), fields(admission_number = %command.admission_number))]
async fn create_student(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<CreateStudentCommand>,
) -> ApiResult<Response> {
    let student = super::commands::create::handle(pool, command).await?;
    Ok(created(student))
}

#[tracing::instrument(skip(pool, command))]
async fn update_student(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut command): ApiJson<UpdateStudentCommand>,
) -> ApiResult<Response> {
    command.id = id;
    let student = super::commands::update::handle(pool, command).await?;
    Ok(ok(student))
}

#[tracing::instrument(skip(pool))]
async fn delete_student(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteStudentCommand { id }).await?;
    Ok(ok(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_students(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListStudentsQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;
    Ok(ok_page(page))
}

#[tracing::instrument(skip(pool))]
async fn export_students(
    State(pool): State<PgPool>,
    ApiQuery(filter): ApiQuery<StudentFilter>,
) -> ApiResult<Response> {
    let body = super::queries::export::handle(pool, filter).await?;
    Ok(csv_response("students.csv", body))
}

#[tracing::instrument(skip(pool))]
async fn get_student(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let student = super::queries::get::handle(pool, GetStudentQuery { id }).await?;
    Ok(ok(student))
}

#[tracing::instrument(skip(pool, query))]
async fn student_overview(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(mut query): ApiQuery<StudentOverviewQuery>,
) -> ApiResult<Response> {
    query.student_id = id;
    let overview = super::queries::overview::handle(pool, query).await?;
    Ok(ok(overview))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<EnrollmentError> for AppError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::ClassNotFound(_) => AppError::NotFound(err.to_string()),
            EnrollmentError::ClassFull { .. } => AppError::Conflict(err.to_string()),
            EnrollmentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateStudentError> for AppError {
    fn from(err: CreateStudentError) -> Self {
        match err {
            CreateStudentError::Validation(_) => AppError::Validation(err.to_string()),
            CreateStudentError::DuplicateAdmissionNumber(_) => AppError::Conflict(err.to_string()),
            CreateStudentError::Enrollment(e) => e.into(),
            CreateStudentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateStudentError> for AppError {
    fn from(err: UpdateStudentError) -> Self {
        match err {
            UpdateStudentError::Validation(_) => AppError::Validation(err.to_string()),
            UpdateStudentError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateStudentError::DuplicateAdmissionNumber => AppError::Conflict(err.to_string()),
            UpdateStudentError::Enrollment(e) => e.into(),
            UpdateStudentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteStudentError> for AppError {
    fn from(err: DeleteStudentError) -> Self {
        match err {
            DeleteStudentError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteStudentError::Enrollment(e) => e.into(),
            DeleteStudentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetStudentError> for AppError {
    fn from(err: GetStudentError) -> Self {
        match err {
            GetStudentError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetStudentError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListStudentsError> for AppError {
    fn from(err: ListStudentsError) -> Self {
        match err {
            ListStudentsError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListStudentsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ExportStudentsError> for AppError {
    fn from(err: ExportStudentsError) -> Self {
        match err {
            ExportStudentsError::Export(e) => AppError::Internal(e.to_string()),
            ExportStudentsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<StudentOverviewError> for AppError {
    fn from(err: StudentOverviewError) -> Self {
        match err {
            StudentOverviewError::InvalidRange(e) => e.into(),
            StudentOverviewError::NotFound(_) => AppError::NotFound(err.to_string()),
            StudentOverviewError::Database(e) => AppError::Database(e),
        }
    }
}
