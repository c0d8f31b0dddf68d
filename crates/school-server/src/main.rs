//! School Server - Main entry point

use std::{net::SocketAddr, time::Duration};

use anyhow::Result;
use tokio::signal;
use tracing::info;

use school_common::logging::{init_logging, LogConfig};
use school_server::{
    api::{self, AppState},
    config::Config,
    db,
    features::reminders::{mailer_from_config, ReminderScheduler},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("school-server")
        .filter_directives("school_server=debug,tower_http=debug,sqlx=info")
        .build();

    // Environment variables take precedence
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    let _log_guard = init_logging(&log_config)?;

    info!("Starting School Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db_pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    db::run_migrations(&db_pool).await?;
    info!("Database migrations completed");

    let mailer = mailer_from_config(&config.reminders)?;
    info!(mailer = mailer.name(), "Reminder mailer configured");

    let scheduler_handle =
        ReminderScheduler::new(config.reminders.clone(), db_pool.clone(), mailer.clone()).start();
    if scheduler_handle.is_none() {
        info!("Fee reminder scheduler is disabled (REMINDERS_ENABLED=false)");
    }

    let state = AppState {
        db: db_pool,
        mailer,
    };

    let app = api::create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    if let Some(handle) = scheduler_handle {
        handle.abort();
    }

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
