//! Configuration management for the auth server
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Signing secret used when `JWT_SECRET` is unset outside production
const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

/// Longest accepted token lifetime (one year)
const MAX_JWT_EXPIRATION_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Current environment
    pub environment: Environment,

    /// Interface the server binds to
    pub host: String,

    /// Server port
    pub port: u16,

    /// PostgreSQL connection URL. Users are kept in memory when unset.
    pub database_url: Option<String>,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins (comma separated)
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// JWT secret for token signing
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 86400 = 24 hours)
    pub jwt_expiration_seconds: i64,

    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|s| s.parse::<Environment>())
            .unwrap_or(Ok(Environment::Development))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS");

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()))
            }
            None => DEV_JWT_SECRET.to_string(),
        };

        let jwt_expiration_seconds = match lookup("JWT_EXPIRATION_SECONDS") {
            Some(raw) => {
                let ttl = raw.parse::<i64>().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "JWT_EXPIRATION_SECONDS must be a number, got '{}'",
                        raw
                    ))
                })?;
                if !(1..=MAX_JWT_EXPIRATION_SECONDS).contains(&ttl) {
                    return Err(ConfigError::InvalidValue(format!(
                        "JWT_EXPIRATION_SECONDS must be between 1 and {}, got {}",
                        MAX_JWT_EXPIRATION_SECONDS, ttl
                    )));
                }
                ttl
            }
            None => 86_400,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => {
                let cost = raw.parse::<u32>().map_err(|_| {
                    ConfigError::InvalidValue(format!("BCRYPT_COST must be a number, got '{}'", raw))
                })?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::InvalidValue(format!(
                        "BCRYPT_COST must be between 4 and 31, got {}",
                        cost
                    )));
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Config {
            environment,
            host,
            port,
            database_url,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            jwt_secret,
            jwt_expiration_seconds,
            bcrypt_cost,
        })
    }

    /// Get database URL with the password masked, for logging
    pub fn database_url_masked(&self) -> Option<String> {
        let url = self.database_url.as_ref()?;
        if let Some(at_pos) = url.find('@') {
            if let Some(colon_pos) = url[..at_pos].rfind(':') {
                let prefix = &url[..colon_pos + 1];
                let suffix = &url[at_pos..];
                return Some(format!("{}****{}", prefix, suffix));
            }
        }
        Some(url.clone())
    }
}
