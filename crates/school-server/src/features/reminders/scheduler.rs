//! In-process monthly reminder scheduler
//!
//! Runs the same cycle as the cron endpoint once a month, on the configured
//! day at [`RUN_HOUR_UTC`]. Disabled unless `REMINDERS_ENABLED` is set.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::commands::{send, SendFeeRemindersCommand};
use super::mailer::ReminderMailer;
use crate::config::ReminderConfig;

/// Hour of day (UTC) at which the monthly cycle runs
pub const RUN_HOUR_UTC: u32 = 6;

/// First run strictly after `now` on `day_of_month` at [`RUN_HOUR_UTC`]
///
/// `day_of_month` is limited to 1..=28 by config validation so every month
/// has that day.
pub fn next_run(now: DateTime<Utc>, day_of_month: u32) -> DateTime<Utc> {
    let at = |year: i32, month: u32| -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(year, month, day_of_month)?;
        let naive = date.and_hms_opt(RUN_HOUR_UTC, 0, 0)?;
        Some(Utc.from_utc_datetime(&naive))
    };

    let (year, month) = (now.year(), now.month());
    if let Some(candidate) = at(year, month) {
        if candidate > now {
            return candidate;
        }
    }

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    at(next_year, next_month).unwrap_or(now + chrono::Duration::days(28))
}

pub struct ReminderScheduler {
    config: ReminderConfig,
    db: PgPool,
    mailer: Arc<dyn ReminderMailer>,
}

impl ReminderScheduler {
    pub fn new(config: ReminderConfig, db: PgPool, mailer: Arc<dyn ReminderMailer>) -> Self {
        Self { config, db, mailer }
    }

    /// Spawn the scheduler loop; returns `None` when disabled
    pub fn start(self) -> Option<JoinHandle<()>> {
        if !self.config.scheduler_enabled {
            info!("Reminder scheduler disabled");
            return None;
        }

        info!(
            day_of_month = self.config.day_of_month,
            mailer = self.mailer.name(),
            "Starting reminder scheduler"
        );

        Some(tokio::spawn(async move { self.run().await }))
    }

    async fn run(self) {
        loop {
            let now = Utc::now();
            let due = next_run(now, self.config.day_of_month);
            info!(next_run = %due, "Next fee reminder cycle scheduled");

            let wait = (due - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            if let Err(e) = send::handle(
                self.db.clone(),
                self.mailer.clone(),
                &self.config.school_name,
                SendFeeRemindersCommand::default(),
            )
            .await
            {
                error!(error = %e, "Scheduled fee reminder cycle failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_this_month() {
        assert_eq!(next_run(utc(2024, 3, 2, 12), 5), utc(2024, 3, 5, RUN_HOUR_UTC));
    }

    #[test]
    fn test_next_run_same_day_before_hour() {
        assert_eq!(next_run(utc(2024, 3, 5, 1), 5), utc(2024, 3, 5, RUN_HOUR_UTC));
    }

    #[test]
    fn test_next_run_rolls_to_next_month() {
        assert_eq!(next_run(utc(2024, 3, 5, 6), 5), utc(2024, 4, 5, RUN_HOUR_UTC));
        assert_eq!(next_run(utc(2024, 3, 20, 0), 1), utc(2024, 4, 1, RUN_HOUR_UTC));
    }

    #[test]
    fn test_next_run_rolls_over_year() {
        assert_eq!(next_run(utc(2024, 12, 31, 23), 1), utc(2025, 1, 1, RUN_HOUR_UTC));
    }

    #[tokio::test]
    async fn test_disabled_scheduler_does_not_start() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/school_test")
            .unwrap();
        let scheduler = ReminderScheduler::new(
            ReminderConfig::default(),
            pool,
            Arc::new(super::super::mailer::LogMailer),
        );
        assert!(scheduler.start().is_none());
    }
}
