//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/school";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Day of the month on which the built-in scheduler sends fee reminders.
pub const DEFAULT_REMINDER_DAY_OF_MONTH: u32 = 1;

/// School name used in reminder messages.
pub const DEFAULT_SCHOOL_NAME: &str = "Our School";

/// Sender address used in reminder messages.
pub const DEFAULT_MAILER_FROM: &str = "accounts@school.local";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub reminders: ReminderConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Fee reminder configuration
///
/// `cron_secret` guards the reminder endpoint. When `mailer_endpoint` is unset
/// reminders are written to the log instead of being delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub cron_secret: Option<String>,
    pub scheduler_enabled: bool,
    pub day_of_month: u32,
    pub school_name: String,
    pub mailer_endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub mailer_api_key: Option<String>,
    pub mailer_from: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            cron_secret: None,
            scheduler_enabled: false,
            day_of_month: DEFAULT_REMINDER_DAY_OF_MONTH,
            school_name: DEFAULT_SCHOOL_NAME.to_string(),
            mailer_endpoint: None,
            mailer_api_key: None,
            mailer_from: DEFAULT_MAILER_FROM.to_string(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("SCHOOL_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_parse("SCHOOL_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_parse(
                    "SCHOOL_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_parse(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_parse(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_parse(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_parse(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_parse("CORS_ALLOW_CREDENTIALS", true),
            },
            reminders: ReminderConfig {
                cron_secret: env_non_empty("CRON_SECRET"),
                scheduler_enabled: env_parse("REMINDERS_ENABLED", false),
                day_of_month: env_parse("REMINDERS_DAY_OF_MONTH", DEFAULT_REMINDER_DAY_OF_MONTH),
                school_name: env_non_empty("SCHOOL_NAME")
                    .unwrap_or_else(|| DEFAULT_SCHOOL_NAME.to_string()),
                mailer_endpoint: env_non_empty("MAILER_ENDPOINT"),
                mailer_api_key: env_non_empty("MAILER_API_KEY"),
                mailer_from: env_non_empty("MAILER_FROM")
                    .unwrap_or_else(|| DEFAULT_MAILER_FROM.to_string()),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        // Day 29-31 does not exist in every month
        if !(1..=28).contains(&self.reminders.day_of_month) {
            anyhow::bail!(
                "REMINDERS_DAY_OF_MONTH must be between 1 and 28, got {}",
                self.reminders.day_of_month
            );
        }

        if let Some(ref endpoint) = self.reminders.mailer_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("MAILER_ENDPOINT must be an http(s) URL");
            }
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        if self.reminders.cron_secret.is_none() {
            tracing::warn!("CRON_SECRET is not set - the fee reminder endpoint is unauthenticated");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            reminders: ReminderConfig::default(),
        }
    }
}
