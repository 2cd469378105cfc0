//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the review API token.
pub const REVIEW_TOKEN_VAR: &str = "REVIEW_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the target chat id.
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Poll loop behavior settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Review API endpoint settings
    #[serde(default)]
    pub review: ReviewConfig,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_secs == 0 {
            return Err(AppError::config("poll.interval_secs must be > 0"));
        }
        if self.review.timeout_secs == 0 {
            return Err(AppError::config("review.timeout_secs must be > 0"));
        }
        if self.telegram.timeout_secs == 0 {
            return Err(AppError::config("telegram.timeout_secs must be > 0"));
        }
        Url::parse(&self.review.url)
            .map_err(|e| AppError::config(format!("review.url is invalid: {e}")))?;
        Url::parse(&self.telegram.api_base)
            .map_err(|e| AppError::config(format!("telegram.api_base is invalid: {e}")))?;
        if self.logging.file.trim().is_empty() {
            return Err(AppError::config("logging.file is empty"));
        }
        Ok(())
    }
}

/// Poll loop behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Pause between iterations in seconds
    #[serde(default = "defaults::poll_interval")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::poll_interval(),
        }
    }
}

/// Review API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Homework status endpoint URL
    #[serde(default = "defaults::review_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            url: defaults::review_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL (override for self-hosted gateways)
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Directory for rotated log files
    #[serde(default = "defaults::log_dir")]
    pub dir: String,

    /// Log file name prefix
    #[serde(default = "defaults::log_file")]
    pub file: String,

    /// Disable the file appender entirely
    #[serde(default)]
    pub console_only: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            dir: defaults::log_dir(),
            file: defaults::log_file(),
            console_only: false,
        }
    }
}

mod defaults {
    pub fn poll_interval() -> u64 {
        300
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "reviewbell/0.1".into()
    }
    pub fn review_url() -> String {
        "https://praktikum.yandex.ru/api/user_api/homework_statuses/".into()
    }
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_dir() -> String {
        "logs".into()
    }
    pub fn log_file() -> String {
        "reviewbell.log".into()
    }
}

/// Required credentials, read from the process environment at startup.
///
/// Absence of any of them is fatal before the poll loop begins.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// OAuth token for the review API
    pub review_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Target chat identifier
    pub chat_id: String,
}

impl Secrets {
    /// Read all required secrets from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            review_token: require_var(REVIEW_TOKEN_VAR)?,
            telegram_token: require_var(TELEGRAM_TOKEN_VAR)?,
            chat_id: require_var(TELEGRAM_CHAT_ID_VAR)?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "required environment variable {name} is not set"
        ))),
    }
}
