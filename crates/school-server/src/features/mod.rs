//! Feature modules implementing the school API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes, following the CQRS split:
//!
//! - `commands/` - Write operations (create, update, delete, ...)
//! - `queries/` - Read operations (get, list, reports)
//! - `routes.rs` - HTTP route definitions and error mapping
//!
//! Commands and queries implement `mediator::Request` so they can also be
//! dispatched through [`crate::cqrs::build_mediator`].
//!
//! # Features
//!
//! - **students**: Admission, enrolment counts, CSV export, parent overview
//! - **teachers**: Staff records and CSV export
//! - **classes**: Classes with capacity and incharge name
//! - **class_incharge**: One active incharge per class
//! - **attendance**: Marking by the incharge, listing, reports
//! - **fees**: Fee records with computed totals
//! - **dashboard**: Headline counters
//! - **reminders**: Fee reminder emails and their scheduler

pub mod attendance;
pub mod class_incharge;
pub mod classes;
pub mod dashboard;
pub mod fees;
pub mod reminders;
pub mod shared;
pub mod students;
pub mod teachers;

use std::sync::Arc;

use axum::Router;

use crate::config::ReminderConfig;
use reminders::{ReminderMailer, ReminderState};

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Delivery for fee reminders
    pub mailer: Arc<dyn ReminderMailer>,
    pub reminders: Arc<ReminderConfig>,
}

/// Creates the API router with every feature mounted under its prefix
///
/// - `/students`, `/teachers`, `/classes`
/// - `/class-incharge`
/// - `/attendance`
/// - `/fees`
/// - `/dashboard`
/// - `/emails` - cron-triggered communications
pub fn router(state: FeatureState) -> Router<()> {
    let reminder_state = ReminderState {
        db: state.db.clone(),
        mailer: state.mailer.clone(),
        config: state.reminders.clone(),
    };

    Router::new()
        .nest("/students", students::students_routes().with_state(state.db.clone()))
        .nest("/teachers", teachers::teachers_routes().with_state(state.db.clone()))
        .nest("/classes", classes::classes_routes().with_state(state.db.clone()))
        .nest(
            "/class-incharge",
            class_incharge::class_incharge_routes().with_state(state.db.clone()),
        )
        .nest("/attendance", attendance::attendance_routes().with_state(state.db.clone()))
        .nest("/fees", fees::fees_routes().with_state(state.db.clone()))
        .nest("/dashboard", dashboard::dashboard_routes().with_state(state.db.clone()))
        .nest("/emails", reminders::reminder_routes().with_state(reminder_state))
}
