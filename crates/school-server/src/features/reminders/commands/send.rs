//! One fee-reminder cycle
//!
//! 1. Flip past-due Pending records to Overdue
//! 2. Load Pending and Overdue records with the parent's email
//! 3. Send one reminder per record, a few at a time
//! 4. Stamp `last_reminded_at` on the records that went out

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::features::fees::commands::mark_overdue::mark_overdue;
use crate::features::reminders::mailer::{FeeReminder, ReminderMailer};
use crate::models::FeeStatus;

/// Reminders in flight at once
pub const MAX_CONCURRENT_SENDS: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SendFeeRemindersCommand {
    /// Reference date for overdue marking; defaults to today (UTC)
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub marked_overdue: u64,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SendFeeRemindersError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ReminderSummary, SendFeeRemindersError>> for SendFeeRemindersCommand {}

impl crate::cqrs::middleware::Command for SendFeeRemindersCommand {}

#[derive(Debug, Clone, FromRow)]
struct OutstandingFeeRow {
    fee_record_id: Uuid,
    amount: i64,
    due_date: NaiveDate,
    status: FeeStatus,
    student_name: String,
    admission_number: String,
    parent_name: Option<String>,
    parent_email: Option<String>,
}

/// Split rows into sendable reminders and a count of rows without an email
fn build_reminders(rows: Vec<OutstandingFeeRow>, school_name: &str) -> (Vec<FeeReminder>, usize) {
    let mut skipped = 0;
    let mut reminders = Vec::with_capacity(rows.len());

    for row in rows {
        let to = row
            .parent_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());
        match to {
            Some(to) => reminders.push(FeeReminder {
                fee_record_id: row.fee_record_id,
                to: to.to_string(),
                parent_name: row.parent_name,
                student_name: row.student_name,
                admission_number: row.admission_number,
                amount: row.amount,
                due_date: row.due_date,
                status: row.status,
                school_name: school_name.to_string(),
            }),
            None => {
                tracing::debug!(fee_record_id = %row.fee_record_id, "No parent email; skipping");
                skipped += 1;
            }
        }
    }

    (reminders, skipped)
}

/// Send reminders concurrently; returns the ids that were delivered and the failure count
pub async fn deliver(
    mailer: Arc<dyn ReminderMailer>,
    reminders: Vec<FeeReminder>,
) -> (Vec<Uuid>, usize) {
    let results: Vec<(Uuid, bool)> = stream::iter(reminders)
        .map(|reminder| {
            let mailer = mailer.clone();
            async move {
                match mailer.send(&reminder).await {
                    Ok(()) => (reminder.fee_record_id, true),
                    Err(e) => {
                        tracing::warn!(
                            fee_record_id = %reminder.fee_record_id,
                            to = %reminder.to,
                            error = %e,
                            "Failed to send fee reminder"
                        );
                        (reminder.fee_record_id, false)
                    }
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_SENDS)
        .collect()
        .await;

    let failed = results.iter().filter(|(_, ok)| !ok).count();
    let sent = results
        .into_iter()
        .filter_map(|(id, ok)| ok.then_some(id))
        .collect();
    (sent, failed)
}

#[tracing::instrument(skip(pool, mailer, school_name), fields(mailer = mailer.name()))]
pub async fn handle(
    pool: PgPool,
    mailer: Arc<dyn ReminderMailer>,
    school_name: &str,
    command: SendFeeRemindersCommand,
) -> Result<ReminderSummary, SendFeeRemindersError> {
    let as_of = command.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let marked_overdue = mark_overdue(&pool, as_of).await?;

    let rows = sqlx::query_as::<_, OutstandingFeeRow>(
        r#"
        SELECT f.id AS fee_record_id,
               f.total_amount AS amount,
               f.due_date,
               f.status,
               CONCAT(s.first_name, ' ', s.last_name) AS student_name,
               s.admission_number,
               s.parent_name,
               s.parent_email
        FROM fee_records f
        JOIN students s ON s.id = f.student_id
        WHERE f.status IN ('Pending', 'Overdue')
        ORDER BY f.due_date, f.id
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let (reminders, skipped) = build_reminders(rows, school_name);
    let (sent_ids, failed) = deliver(mailer, reminders).await;

    if !sent_ids.is_empty() {
        sqlx::query("UPDATE fee_records SET last_reminded_at = NOW() WHERE id = ANY($1)")
            .bind(&sent_ids)
            .execute(&pool)
            .await?;
    }

    let summary = ReminderSummary {
        marked_overdue,
        sent: sent_ids.len(),
        failed,
        skipped,
    };

    tracing::info!(
        marked_overdue = summary.marked_overdue,
        sent = summary.sent,
        failed = summary.failed,
        skipped = summary.skipped,
        "Fee reminder cycle finished"
    );

    Ok(summary)
}
