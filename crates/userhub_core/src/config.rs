//! Runtime configuration loaded from environment variables.
//!
//! # Responsibility
//! - Resolve service settings with defaults for every key.
//! - Reject malformed values with a typed error instead of panicking.
//!
//! # Invariants
//! - Empty values behave exactly like unset values.
//! - Ports are non-zero.

use crate::logging::{default_log_level, LogTarget};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(ms|s|m|h)$").expect("valid duration regex"));

pub const DEFAULT_SERVICE_NAME: &str = "grpc-user-service";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_GRPC_PORT: u16 = 9090;
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_GRACEFUL_SHUTDOWN: Duration = Duration::from_secs(15);

/// Configuration value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort { key: &'static str, value: String },
    InvalidDuration { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort { key, value } => {
                write!(f, "invalid port for {key}: `{value}`")
            }
            Self::InvalidDuration { key, value } => {
                write!(f, "invalid duration for {key}: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for the user service and the transport that hosts it.
///
/// Ports and the shutdown timeout are carried as data only; the core never
/// binds sockets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: String,
    pub grpc_port: u16,
    pub http_port: u16,
    pub graceful_shutdown: Duration,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            grpc_port: DEFAULT_GRPC_PORT,
            http_port: DEFAULT_HTTP_PORT,
            graceful_shutdown: DEFAULT_GRACEFUL_SHUTDOWN,
            log_level: default_log_level().to_string(),
            log_target: LogTarget::Stdout,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Every value is trimmed; a value that trims to empty counts as unset.
    ///
    /// # Errors
    /// - `InvalidPort` when `GRPC_PORT`/`HTTP_PORT` is not a non-zero `u16`.
    /// - `InvalidDuration` when `GRACEFUL_SHUTDOWN` is not `<n>(ms|s|m|h)`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let grpc_port = match get("GRPC_PORT") {
            Some(value) => parse_port("GRPC_PORT", &value)?,
            None => defaults.grpc_port,
        };
        let http_port = match get("HTTP_PORT") {
            Some(value) => parse_port("HTTP_PORT", &value)?,
            None => defaults.http_port,
        };
        let graceful_shutdown = match get("GRACEFUL_SHUTDOWN") {
            Some(value) => parse_duration("GRACEFUL_SHUTDOWN", &value)?,
            None => defaults.graceful_shutdown,
        };
        let log_target = match get("LOG_DIR") {
            Some(dir) => LogTarget::Directory(PathBuf::from(dir)),
            None => defaults.log_target,
        };

        Ok(Self {
            service_name: get("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: get("APP_ENV").unwrap_or(defaults.environment),
            grpc_port,
            http_port,
            graceful_shutdown,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_target,
        })
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            key,
            value: value.to_string(),
        }),
    }
}

/// Parses `<integer><unit>` where unit is `ms`, `s`, `m` or `h`.
pub fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        key,
        value: value.to_string(),
    };
    let caps = DURATION_RE.captures(value.trim()).ok_or_else(invalid)?;
    let amount: u64 = caps[1].parse().map_err(|_| invalid())?;
    let duration = match &caps[2] {
        "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.checked_mul(60).ok_or_else(invalid)?),
        "h" => Duration::from_secs(amount.checked_mul(3_600).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };
    Ok(duration)
}
