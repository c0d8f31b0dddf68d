//! Reminder delivery
//!
//! [`LogMailer`] writes reminders to the log and is the default.
//! [`HttpMailer`] posts a JSON message to a configured email endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ReminderConfig;
use crate::models::FeeStatus;

/// Timeout for one HTTP send
pub const DEFAULT_MAILER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mailer rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Everything needed to render one reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReminder {
    pub fee_record_id: Uuid,
    pub to: String,
    pub parent_name: Option<String>,
    pub student_name: String,
    pub admission_number: String,
    pub amount: i64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    pub school_name: String,
}

impl FeeReminder {
    pub fn subject(&self) -> String {
        match self.status {
            FeeStatus::Overdue => format!(
                "{}: overdue fee for {}",
                self.school_name, self.student_name
            ),
            _ => format!(
                "{}: fee reminder for {}",
                self.school_name, self.student_name
            ),
        }
    }

    pub fn body(&self) -> String {
        let greeting = match self.parent_name.as_deref() {
            Some(name) => format!("Dear {},", name),
            None => "Dear Parent/Guardian,".to_string(),
        };
        let state = match self.status {
            FeeStatus::Overdue => "was due",
            _ => "is due",
        };
        format!(
            "{greeting}\n\nA fee of {amount} for {student} (admission no. {admission}) {state} on {due}.\n\
             Please arrange payment at the earliest.\n\nRegards,\n{school}",
            amount = self.amount,
            student = self.student_name,
            admission = self.admission_number,
            due = self.due_date.format("%d %b %Y"),
            school = self.school_name,
        )
    }
}

#[async_trait]
pub trait ReminderMailer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn send(&self, reminder: &FeeReminder) -> Result<(), MailerError>;
}

/// Logs reminders instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl ReminderMailer for LogMailer {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, reminder: &FeeReminder) -> Result<(), MailerError> {
        tracing::info!(
            fee_record_id = %reminder.fee_record_id,
            to = %reminder.to,
            amount = reminder.amount,
            subject = %reminder.subject(),
            "Fee reminder"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

/// Posts `{from, to, subject, text}` as JSON to an email endpoint
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_MAILER_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl ReminderMailer for HttpMailer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, reminder: &FeeReminder) -> Result<(), MailerError> {
        let message = OutgoingMessage {
            from: &self.from,
            to: &reminder.to,
            subject: reminder.subject(),
            text: reminder.body(),
        };

        let mut request = self.client.post(&self.endpoint).json(&message);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(fee_record_id = %reminder.fee_record_id, "Reminder accepted by mailer");
        Ok(())
    }
}

/// HTTP mailer when an endpoint is configured, otherwise the log mailer
pub fn mailer_from_config(config: &ReminderConfig) -> Result<Arc<dyn ReminderMailer>, MailerError> {
    match config.mailer_endpoint {
        Some(ref endpoint) => Ok(Arc::new(HttpMailer::new(
            endpoint.clone(),
            config.mailer_api_key.clone(),
            config.mailer_from.clone(),
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}
