//! Communication routes
//!
//! - `POST /api/emails/send-fee-reminders` - Run one reminder cycle
//!   (`Authorization: Bearer <CRON_SECRET>` when a secret is configured)

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    routing::post,
    Router,
};
use sqlx::PgPool;

use crate::api::response::{ok, ApiResult, AppError, OptionalJson};
use crate::config::ReminderConfig;
use crate::middleware::require_cron_secret;

use super::commands::{SendFeeRemindersCommand, SendFeeRemindersError};
use super::mailer::ReminderMailer;

#[derive(Clone)]
pub struct ReminderState {
    pub db: PgPool,
    pub mailer: Arc<dyn ReminderMailer>,
    pub config: Arc<ReminderConfig>,
}

pub fn reminder_routes() -> Router<ReminderState> {
    Router::new().route("/send-fee-reminders", post(send_fee_reminders))
}

/// Body is optional; an empty request uses today's date, a malformed one is a 400
#[tracing::instrument(skip(state, headers, command))]
async fn send_fee_reminders(
    State(state): State<ReminderState>,
    headers: HeaderMap,
    OptionalJson(command): OptionalJson<SendFeeRemindersCommand>,
) -> ApiResult<Response> {
    require_cron_secret(&headers, state.config.cron_secret.as_deref())?;

    let summary = super::commands::send::handle(
        state.db.clone(),
        state.mailer.clone(),
        &state.config.school_name,
        command,
    )
    .await?;

    Ok(ok(summary))
}

impl From<SendFeeRemindersError> for AppError {
    fn from(err: SendFeeRemindersError) -> Self {
        match err {
            SendFeeRemindersError::Database(e) => AppError::Database(e),
        }
    }
}
