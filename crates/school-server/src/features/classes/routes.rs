//! Class API routes
//!
//! - `POST /api/classes` - Create a class
//! - `GET /api/classes` - List classes (`academicYear`, `search`, `page`, `perPage`)
//! - `GET /api/classes/:id` - Get a class with its incharge name
//! - `PUT /api/classes/:id` - Update a class
//! - `DELETE /api/classes/:id` - Delete an empty class

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{created, ok, ok_page, ApiJson, ApiPath, ApiQuery, ApiResult, AppError};

use super::{
    commands::{
        CreateClassCommand, CreateClassError, DeleteClassCommand, DeleteClassError,
        UpdateClassCommand, UpdateClassError,
    },
    queries::{GetClassError, GetClassQuery, ListClassesError, ListClassesQuery},
};

pub fn classes_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_class).get(list_classes))
        .route("/:id", get(get_class).put(update_class).delete(delete_class))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, command), fields(name = %command.name, section = %command.section))]
async fn create_class(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<CreateClassCommand>,
) -> ApiResult<Response> {
    let class = super::commands::create::handle(pool, command).await?;
    Ok(created(class))
}

#[tracing::instrument(skip(pool, command))]
async fn update_class(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut command): ApiJson<UpdateClassCommand>,
) -> ApiResult<Response> {
    command.id = id;
    let class = super::commands::update::handle(pool, command).await?;
    Ok(ok(class))
}

#[tracing::instrument(skip(pool))]
async fn delete_class(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteClassCommand { id }).await?;
    Ok(ok(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn get_class(State(pool): State<PgPool>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Response> {
    let class = super::queries::get::handle(pool, GetClassQuery { id }).await?;
    Ok(ok(class))
}

#[tracing::instrument(skip(pool))]
async fn list_classes(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListClassesQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;
    Ok(ok_page(page))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateClassError> for AppError {
    fn from(err: CreateClassError) -> Self {
        match err {
            CreateClassError::Validation(_) => AppError::Validation(err.to_string()),
            CreateClassError::Duplicate { .. } => AppError::Conflict(err.to_string()),
            CreateClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateClassError> for AppError {
    fn from(err: UpdateClassError) -> Self {
        match err {
            UpdateClassError::Validation(_) | UpdateClassError::NoFieldsToUpdate => {
                AppError::Validation(err.to_string())
            },
            UpdateClassError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateClassError::CapacityBelowEnrollment { .. } | UpdateClassError::Duplicate => {
                AppError::Conflict(err.to_string())
            },
            UpdateClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteClassError> for AppError {
    fn from(err: DeleteClassError) -> Self {
        match err {
            DeleteClassError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteClassError::HasStudents(_) => AppError::Conflict(err.to_string()),
            DeleteClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetClassError> for AppError {
    fn from(err: GetClassError) -> Self {
        match err {
            GetClassError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetClassError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListClassesError> for AppError {
    fn from(err: ListClassesError) -> Self {
        match err {
            ListClassesError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListClassesError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_has_students_maps_to_conflict() {
        let err: AppError = DeleteClassError::HasStudents(12).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_capacity_error_maps_to_conflict() {
        let err: AppError = UpdateClassError::CapacityBelowEnrollment {
            capacity: 10,
            current: 12,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
