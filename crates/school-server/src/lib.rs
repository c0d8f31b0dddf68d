//! School Server Library
//!
//! HTTP backend for running a school: students, teachers, classes,
//! attendance, fees and fee reminders.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** layout:
//!
//! - **Commands** (write operations) validate their input, run inside a
//!   transaction where several rows must change together, and return the
//!   stored record.
//! - **Queries** (read operations) support filtering and pagination and
//!   join referenced records for display names.
//!
//! Cross-record rules live in the command handlers: only a class's active
//! incharge may mark attendance, a class with enrolled students cannot be
//! deleted, and a class has at most one active incharge.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extraction
//! - **SQLx**: PostgreSQL access and migrations
//! - **Tower**: Middleware (tracing, CORS, compression)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use school_server::{api, config::Config, db, features::reminders::LogMailer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let state = api::AppState { db: pool, mailer: Arc::new(LogMailer) };
//!     let app = api::create_router(state, &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod features;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use api::response::{AppError, ApiResult};
