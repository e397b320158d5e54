//! Runtime configuration resolved from environment variables.
//!
//! # Invariants
//! - Resolution is a pure function over a key lookup; `from_env` is the only
//!   entry point that reads process state.
//! - Invalid values are rejected, never silently replaced by defaults.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "PAGEGEN_DB_PATH";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_BASE: &str = "PAGEGEN_API_BASE";
pub const ENV_MODEL: &str = "PAGEGEN_MODEL";
pub const ENV_TEMPERATURE: &str = "PAGEGEN_TEMPERATURE";
pub const ENV_TIMEOUT_SECS: &str = "PAGEGEN_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "PAGEGEN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PAGEGEN_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "pagegen.sqlite3";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.8;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the external completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub api_base: String,
    /// `None` when unset; real generation refuses to start without it.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub generator: GeneratorConfig,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let temperature = match get(ENV_TEMPERATURE) {
            Some(raw) => match raw.parse::<f32>() {
                Ok(value) if value > 0.0 && value <= 2.0 => value,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_TEMPERATURE,
                        value: raw,
                        reason: "expected a number above 0.0 and at most 2.0",
                    })
                }
            },
            None => DEFAULT_TEMPERATURE,
        };

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_TIMEOUT_SECS,
                        value: raw,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_dir = match get(ENV_LOG_DIR) {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_LOG_DIR,
                        value: raw,
                        reason: "expected an absolute path",
                    });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            db_path,
            generator: GeneratorConfig {
                api_base: get(ENV_API_BASE)
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                api_key: get(ENV_API_KEY),
                model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                temperature,
                timeout,
            },
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }
}
