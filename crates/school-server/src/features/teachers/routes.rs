//! Teacher API routes
//!
//! - `POST /api/teachers` - Create a teacher
//! - `GET /api/teachers` - List teachers (`search`, `subject`, `status`, `page`, `perPage`)
//! - `GET /api/teachers/export` - Same filters, as CSV
//! - `GET /api/teachers/:id` - Get a teacher
//! - `PUT /api/teachers/:id` - Update a teacher
//! - `DELETE /api/teachers/:id` - Delete a teacher

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

use super::{
    commands::{
        CreateTeacherCommand, CreateTeacherError, DeleteTeacherCommand, DeleteTeacherError,
        UpdateTeacherCommand, UpdateTeacherError,
    },
    queries::{
        export::ExportTeachersError, GetTeacherError, GetTeacherQuery, ListTeachersError,
        ListTeachersQuery, TeacherFilter,
    },
};

pub fn teachers_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_teacher).get(list_teachers))
        .route("/export", get(export_teachers))
        .route("/:id", get(get_teacher).put(update_teacher).delete(delete_teacher))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, command), fields(employee_id = %command.employee_id))]
async fn create_teacher(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<CreateTeacherCommand>,
) -> ApiResult<Response> {
    let teacher = super::commands::create::handle(pool, command).await?;
    Ok(created(teacher))
}

#[tracing::instrument(skip(pool, command))]
async fn update_teacher(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut command): ApiJson<UpdateTeacherCommand>,
) -> ApiResult<Response> {
    command.id = id;
    let teacher = super::commands::update::handle(pool, command).await?;
    Ok(ok(teacher))
}

#[tracing::instrument(skip(pool))]
async fn delete_teacher(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteTeacherCommand { id }).await?;
    Ok(ok(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_teachers(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListTeachersQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;
    Ok(ok_page(page))
}

#[tracing::instrument(skip(pool))]
async fn export_teachers(
    State(pool): State<PgPool>,
    ApiQuery(filter): ApiQuery<TeacherFilter>,
) -> ApiResult<Response> {
    let body = super::queries::export::handle(pool, filter).await?;
    Ok(csv_response("teachers.csv", body))
}

#[tracing::instrument(skip(pool))]
async fn get_teacher(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let teacher = super::queries::get::handle(pool, GetTeacherQuery { id }).await?;
    Ok(ok(teacher))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateTeacherError> for AppError {
    fn from(err: CreateTeacherError) -> Self {
        match err {
            CreateTeacherError::Validation(_) => AppError::Validation(err.to_string()),
            CreateTeacherError::Duplicate(_) => AppError::Conflict(err.to_string()),
            CreateTeacherError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateTeacherError> for AppError {
    fn from(err: UpdateTeacherError) -> Self {
        match err {
            UpdateTeacherError::Validation(_) => AppError::Validation(err.to_string()),
            UpdateTeacherError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateTeacherError::Duplicate(_) => AppError::Conflict(err.to_string()),
            UpdateTeacherError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteTeacherError> for AppError {
    fn from(err: DeleteTeacherError) -> Self {
        match err {
            DeleteTeacherError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteTeacherError::ActiveIncharge(_) => AppError::Conflict(err.to_string()),
            DeleteTeacherError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetTeacherError> for AppError {
    fn from(err: GetTeacherError) -> Self {
        match err {
            GetTeacherError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetTeacherError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListTeachersError> for AppError {
    fn from(err: ListTeachersError) -> Self {
        match err {
            ListTeachersError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListTeachersError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ExportTeachersError> for AppError {
    fn from(err: ExportTeachersError) -> Self {
        match err {
            ExportTeachersError::Export(e) => AppError::Internal(e.to_string()),
            ExportTeachersError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::teachers::commands::DuplicateTeacherField;
    use axum::http::StatusCode;

    #[test]
    fn test_active_incharge_blocks_delete_with_conflict() {
        let err: AppError = DeleteTeacherError::ActiveIncharge(1).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_duplicate_email_message() {
        let err: AppError = CreateTeacherError::Duplicate(DuplicateTeacherField::Email).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("email"));
    }
}
