//! Server configuration.

use std::env;
use std::fmt;

use anyhow::Context;

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL. `None` keeps everything in memory.
    pub database_url: Option<String>,
    /// Secret used to sign access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in days.
    pub jwt_expiration_days: u64,
    /// bcrypt cost for password hashing.
    pub bcrypt_cost: u32,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_days", &self.jwt_expiration_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("TODO_JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .context("TODO_JWT_SECRET is required")?;

        let port = parse_or(&lookup, "TODO_SERVER_PORT", 5000)?;
        let jwt_expiration_days =
            parse_or(&lookup, "TODO_JWT_EXPIRATION_DAYS", auth::DEFAULT_JWT_EXPIRATION_DAYS)?;
        if !(1..=auth::MAX_JWT_EXPIRATION_DAYS).contains(&jwt_expiration_days) {
            anyhow::bail!(
                "TODO_JWT_EXPIRATION_DAYS must be between 1 and {}, got {jwt_expiration_days}",
                auth::MAX_JWT_EXPIRATION_DAYS
            );
        }

        Ok(Self {
            host: lookup("TODO_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
            jwt_expiration_days,
            bcrypt_cost: parse_or(&lookup, "TODO_BCRYPT_COST", 12)?,
            log_level: lookup("TODO_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
