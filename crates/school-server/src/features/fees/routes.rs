//! Fee record API routes
//!
//! - `POST /api/fees` - Create a record (items default to the student's fee structure)
//! - `GET /api/fees` - List records (`studentId`, `status`, `page`, `perPage`)
//! - `POST /api/fees/mark-overdue` - Flip past-due Pending records to Overdue
//! - `GET /api/fees/:id` - Get a record
//! - `PUT /api/fees/:id` - Update items, due date, status or remarks
//! - `POST /api/fees/:id/pay` - Mark as paid
//! - `DELETE /api/fees/:id` - Delete a record

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{
    created, ok, ok_page, ApiJson, ApiPath, ApiQuery, ApiResult, AppError, OptionalJson,
};

use super::{
    commands::{
        CreateFeeRecordCommand, CreateFeeRecordError, DeleteFeeRecordCommand,
        DeleteFeeRecordError, MarkOverdueCommand, MarkOverdueError, PayFeeRecordCommand,
        PayFeeRecordError, UpdateFeeRecordCommand, UpdateFeeRecordError,
    },
    queries::{GetFeeRecordError, GetFeeRecordQuery, ListFeeRecordsError, ListFeeRecordsQuery},
};

pub fn fees_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_fee_record).get(list_fee_records))
        .route("/mark-overdue", post(mark_overdue))
        .route(
            "/:id",
            get(get_fee_record)
                .put(update_fee_record)
                .delete(delete_fee_record),
        )
        .route("/:id/pay", post(pay_fee_record))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, command), fields(student_id = %command.student_id))]
async fn create_fee_record(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<CreateFeeRecordCommand>,
) -> ApiResult<Response> {
    let record = super::commands::create::handle(pool, command).await?;
    Ok(created(record))
}

#[tracing::instrument(skip(pool, command))]
async fn update_fee_record(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(mut command): ApiJson<UpdateFeeRecordCommand>,
) -> ApiResult<Response> {
    command.id = id;
    let record = super::commands::update::handle(pool, command).await?;
    Ok(ok(record))
}

#[tracing::instrument(skip(pool))]
async fn pay_fee_record(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let record = super::commands::pay::handle(pool, PayFeeRecordCommand { id }).await?;
    Ok(ok(record))
}

/// Body is optional; an empty request uses today's date, a malformed one is a 400
#[tracing::instrument(skip(pool, command))]
async fn mark_overdue(
    State(pool): State<PgPool>,
    OptionalJson(command): OptionalJson<MarkOverdueCommand>,
) -> ApiResult<Response> {
    let response = super::commands::mark_overdue::handle(pool, command).await?;
    Ok(ok(response))
}

#[tracing::instrument(skip(pool))]
async fn delete_fee_record(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteFeeRecordCommand { id }).await?;
    Ok(ok(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_fee_records(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListFeeRecordsQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;
    Ok(ok_page(page))
}

#[tracing::instrument(skip(pool))]
async fn get_fee_record(
    State(pool): State<PgPool>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let record = super::queries::get::handle(pool, GetFeeRecordQuery { id }).await?;
    Ok(ok(record))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateFeeRecordError> for AppError {
    fn from(err: CreateFeeRecordError) -> Self {
        match err {
            CreateFeeRecordError::Items(_) | CreateFeeRecordError::Validation(_) => {
                AppError::Validation(err.to_string())
            }
            CreateFeeRecordError::StudentNotFound(_) => AppError::NotFound(err.to_string()),
            CreateFeeRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateFeeRecordError> for AppError {
    fn from(err: UpdateFeeRecordError) -> Self {
        match err {
            UpdateFeeRecordError::Items(_)
            | UpdateFeeRecordError::Validation(_)
            | UpdateFeeRecordError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateFeeRecordError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateFeeRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<PayFeeRecordError> for AppError {
    fn from(err: PayFeeRecordError) -> Self {
        match err {
            PayFeeRecordError::NotFound(_) => AppError::NotFound(err.to_string()),
            PayFeeRecordError::AlreadyPaid(_) => AppError::Conflict(err.to_string()),
            PayFeeRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<MarkOverdueError> for AppError {
    fn from(err: MarkOverdueError) -> Self {
        match err {
            MarkOverdueError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteFeeRecordError> for AppError {
    fn from(err: DeleteFeeRecordError) -> Self {
        match err {
            DeleteFeeRecordError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteFeeRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetFeeRecordError> for AppError {
    fn from(err: GetFeeRecordError) -> Self {
        match err {
            GetFeeRecordError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetFeeRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListFeeRecordsError> for AppError {
    fn from(err: ListFeeRecordsError) -> Self {
        match err {
            ListFeeRecordsError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListFeeRecordsError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fees::computation::FeeItemsError;
    use axum::http::StatusCode;

    #[test]
    fn test_negative_amount_is_bad_request() {
        let err: AppError = CreateFeeRecordError::Items(FeeItemsError::NegativeAmount {
            fee_type: "Tuition".into(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_paying_twice_is_conflict() {
        let err: AppError = PayFeeRecordError::AlreadyPaid(Uuid::nil()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
