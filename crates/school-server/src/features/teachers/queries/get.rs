use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Teacher;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTeacherQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetTeacherError {
    #[error("Teacher '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Teacher, GetTeacherError>> for GetTeacherQuery {}

impl crate::cqrs::middleware::Query for GetTeacherQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetTeacherQuery) -> Result<Teacher, GetTeacherError> {
    sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE id = $1")
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetTeacherError::NotFound(query.id))
}
