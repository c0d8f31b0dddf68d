use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::classes::types::{ClassDetail, CLASS_DETAIL_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetClassQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetClassError {
    #[error("Class '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ClassDetail, GetClassError>> for GetClassQuery {}

impl crate::cqrs::middleware::Query for GetClassQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetClassQuery) -> Result<ClassDetail, GetClassError> {
    let sql = format!("{CLASS_DETAIL_SELECT} WHERE c.id = $1");
    sqlx::query_as::<_, ClassDetail>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetClassError::NotFound(query.id))
}
