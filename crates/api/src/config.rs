//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use clubhouse_auth::{DEFAULT_TOKEN_TTL, TokenConfig};

pub const DEFAULT_ISSUER: &str = "clubhouse";
pub const DEFAULT_AUDIENCE: &str = "clubhouse-api";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("token settings: {0}")]
    Token(#[from] clubhouse_auth::ConfigError),

    #[error("{name} is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Immutable application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: TokenConfig,
    pub bind_addr: SocketAddr,
    /// When unset, the in-memory backends are used.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
}

impl AppConfig {
    /// In-memory configuration around an already-built token config.
    pub fn new(token: TokenConfig) -> Self {
        Self {
            token,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
        }
    }

    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_secs = parse_var(&lookup, "JWT_TTL_SECS", DEFAULT_TOKEN_TTL.as_secs())?;
        let token = TokenConfig::new(
            lookup("JWT_SECRET").unwrap_or_default(),
            lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            lookup("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            Duration::from_secs(ttl_secs),
        )?;

        let bind_addr = parse_var(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|e| AppConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?,
        )?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let database_max_connections = parse_var(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;

        Ok(Self {
            token,
            bind_addr,
            database_url,
            database_max_connections,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, AppConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| AppConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
