use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::list::{FeeRecordDetail, FEE_DETAIL_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFeeRecordQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetFeeRecordError {
    #[error("Fee record '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<FeeRecordDetail, GetFeeRecordError>> for GetFeeRecordQuery {}

impl crate::cqrs::middleware::Query for GetFeeRecordQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetFeeRecordQuery,
) -> Result<FeeRecordDetail, GetFeeRecordError> {
    let sql = format!("{FEE_DETAIL_SELECT} WHERE f.id = $1");
    sqlx::query_as::<_, FeeRecordDetail>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetFeeRecordError::NotFound(query.id))
}
