//! Environment-driven server configuration.
//!
//! # Invariants
//! - Unset variables fall back to documented defaults.
//! - Set-but-invalid variables are rejected, never silently defaulted.

use quill_core::default_log_level;
use quill_core::logging::{validate_level, validate_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_FILE: &str = "data/articles.json";

const ENV_PORT: &str = "PORT";
const ENV_BIND_HOST: &str = "QUILL_BIND_HOST";
const ENV_DATA_FILE: &str = "QUILL_DATA_FILE";
const ENV_LOG_LEVEL: &str = "QUILL_LOG_LEVEL";
const ENV_LOG_DIR: &str = "QUILL_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidBindAddress(String),
    InvalidLogging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => {
                write!(f, "{ENV_PORT} must be a port number in 1..=65535, got `{value}`")
            }
            Self::InvalidBindAddress(value) => {
                write!(f, "{ENV_BIND_HOST} is not a valid listen host: `{value}`")
            }
            Self::InvalidLogging(message) => write!(f, "invalid logging config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub log_level: String,
    /// `None` logs to stderr.
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var(ENV_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let host = var(ENV_BIND_HOST).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
        let bind_addr = host
            .parse::<std::net::IpAddr>()
            .map(|ip| SocketAddr::new(ip, port))
            .map_err(|_| ConfigError::InvalidBindAddress(host))?;

        let log_level = match var(ENV_LOG_LEVEL) {
            Some(raw) => validate_level(&raw).map_err(ConfigError::InvalidLogging)?,
            None => default_log_level(),
        };

        let log_dir = var(ENV_LOG_DIR);
        if let Some(dir) = log_dir.as_deref() {
            validate_log_dir(dir).map_err(ConfigError::InvalidLogging)?;
        }

        Ok(Self {
            bind_addr,
            data_file: var(ENV_DATA_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            log_level: log_level.to_string(),
            log_dir,
        })
    }
}
