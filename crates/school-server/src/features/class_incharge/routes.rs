//! Class incharge API routes
//!
//! - `POST /api/class-incharge` - Assign `{teacherId, classId}`
//! - `GET /api/class-incharge` - List assignments (`classId`, `teacherId`, `activeOnly`)
//! - `DELETE /api/class-incharge/:classId` - Remove the class's active incharge

use axum::{
    extract::State,
    response::Response,
    routing::{delete, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{created, ok, ApiJson, ApiPath, ApiQuery, ApiResult, AppError};

use super::{
    commands::{
        AssignInchargeCommand, AssignInchargeError, RemoveInchargeCommand, RemoveInchargeError,
    },
    queries::{ListInchargesError, ListInchargesQuery},
};

pub fn class_incharge_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(assign_incharge).get(list_incharges))
        .route("/:class_id", delete(remove_incharge))
}

#[tracing::instrument(skip(pool))]
async fn assign_incharge(
    State(pool): State<PgPool>,
    ApiJson(command): ApiJson<AssignInchargeCommand>,
) -> ApiResult<Response> {
    let response = super::commands::assign::handle(pool, command).await?;
    if response.changed {
        Ok(created(response))
    } else {
        Ok(ok(response))
    }
}

#[tracing::instrument(skip(pool))]
async fn remove_incharge(
    State(pool): State<PgPool>,
    ApiPath(class_id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let response = super::commands::remove::handle(pool, RemoveInchargeCommand { class_id }).await?;
    Ok(ok(response))
}

#[tracing::instrument(skip(pool))]
async fn list_incharges(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<ListInchargesQuery>,
) -> ApiResult<Response> {
    let assignments = super::queries::list::handle(pool, query).await?;
    Ok(ok(assignments))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<AssignInchargeError> for AppError {
    fn from(err: AssignInchargeError) -> Self {
        match err {
            AssignInchargeError::TeacherNotFound(_) | AssignInchargeError::ClassNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            AssignInchargeError::TeacherNotActive(_) => AppError::Validation(err.to_string()),
            AssignInchargeError::Conflict(_) => AppError::Conflict(err.to_string()),
            AssignInchargeError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RemoveInchargeError> for AppError {
    fn from(err: RemoveInchargeError) -> Self {
        match err {
            RemoveInchargeError::ClassNotFound(_) | RemoveInchargeError::NotAssigned(_) => {
                AppError::NotFound(err.to_string())
            }
            RemoveInchargeError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListInchargesError> for AppError {
    fn from(err: ListInchargesError) -> Self {
        match err {
            ListInchargesError::Database(e) => AppError::Database(e),
        }
    }
}
