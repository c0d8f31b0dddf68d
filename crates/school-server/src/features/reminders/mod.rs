//! Fee reminder emails
//!
//! One reminder per outstanding fee record goes to the student's parent
//! email through a [`mailer::ReminderMailer`]. The cycle is triggered by an
//! external cron hitting `POST /api/emails/send-fee-reminders` and, when
//! enabled, by the in-process [`scheduler::ReminderScheduler`].

pub mod commands;
pub mod mailer;
pub mod routes;
pub mod scheduler;

pub use mailer::{mailer_from_config, FeeReminder, HttpMailer, LogMailer, MailerError, ReminderMailer};
pub use routes::{reminder_routes, ReminderState};
pub use scheduler::ReminderScheduler;
