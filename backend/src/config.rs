//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name (e.g. "development", "production")
    pub app_env: String,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Upper bound on handling a single request (in seconds)
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL or file path
    pub url: String,
    /// Size of the connection pool
    pub max_connections: u32,
    /// Connection attempts before giving up at startup
    pub connect_retries: u32,
    /// Pause between connection attempts (in seconds)
    pub retry_pause_secs: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            app_env: env_string_or("APP_ENV", "development"),
            log_level: env_string_or("LOG_LEVEL", "info"),
            server: ServerConfig {
                port: env_or("PORT", 8080),
                host: env_string_or("HOST", "0.0.0.0"),
                request_timeout_secs: env_or("HTTP_TIMEOUT_SECS", 10),
            },
            database: DatabaseConfig {
                url: env_string_or("DATABASE_URL", "sqlite:subscriptions.db"),
                max_connections: env_or("DB_MAX_CONNECTIONS", 5),
                connect_retries: env_or("DB_CONNECT_RETRIES", 5),
                retry_pause_secs: env_or("DB_RETRY_PAUSE_SECS", 3),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    /// Pause between connection attempts as a `Duration`
    pub fn retry_pause(&self) -> Duration {
        Duration::from_secs(self.retry_pause_secs)
    }
}
