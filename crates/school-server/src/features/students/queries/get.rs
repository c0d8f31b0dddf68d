use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Student;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStudentQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetStudentError {
    #[error("Student '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Student, GetStudentError>> for GetStudentQuery {}

impl crate::cqrs::middleware::Query for GetStudentQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetStudentQuery) -> Result<Student, GetStudentError> {
    sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetStudentError::NotFound(query.id))
}
