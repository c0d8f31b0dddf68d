//! Dashboard API routes
//!
//! - `GET /api/dashboard/stats` - Student, teacher and class counts, attendance for a day, fee totals

use axum::{extract::State, response::Response, routing::get, Router};
use sqlx::PgPool;

use crate::api::response::{ok, ApiQuery, ApiResult, AppError};

use super::queries::{DashboardStatsError, DashboardStatsQuery};

pub fn dashboard_routes() -> Router<PgPool> {
    Router::new().route("/stats", get(dashboard_stats))
}

#[tracing::instrument(skip(pool))]
async fn dashboard_stats(
    State(pool): State<PgPool>,
    ApiQuery(query): ApiQuery<DashboardStatsQuery>,
) -> ApiResult<Response> {
    let stats = super::queries::stats::handle(pool, query).await?;
    Ok(ok(stats))
}

impl From<DashboardStatsError> for AppError {
    fn from(err: DashboardStatsError) -> Self {
        match err {
            DashboardStatsError::Database(e) => AppError::Database(e),
        }
    }
}
