pub mod auth;
pub mod database;
pub mod server;
pub mod uploads;

use std::env;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Application configuration loaded from environment variables
///
/// Built once by the bootstrapper and handed to handlers through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub uploads: uploads::UploadConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,

    /// Insert the demo admin, student, scholarships and budget on startup
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            uploads: uploads::UploadConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("SCHOLARHUB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("SCHOLARHUB_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Text),

            seed_demo_data: env_flag("SCHOLARHUB_SEED_DEMO"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: server::ServerConfig::default(),
            database: database::DatabaseConfig::default(),
            auth: auth::AuthConfig::default(),
            uploads: uploads::UploadConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            seed_demo_data: false,
        }
    }
}

/// Read a boolean flag ("true"/"1", case-insensitive)
pub(crate) fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}
