use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.poll_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gate.poll_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.gate.max_backoff_secs == 0 {
            return Err(ConfigError::Validation(
                "gate.max_backoff_secs must be at least 1".to_string(),
            ));
        }
        if self.telegram.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "telegram.api_base must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials and endpoint of the bot that carries approval messages.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub chat_id: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl TelegramConfig {
    /// A channel is usable only when both credentials are non-blank.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

// Hand-written so the bot token never ends up in a `{:?}` log line.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.bot_token.trim().is_empty() {
            "<unset>"
        } else {
            "[REDACTED]"
        };
        f.debug_struct("TelegramConfig")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Used when the caller does not pass an explicit timeout.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    /// Server-side wait of a single long-poll call.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Ceiling of the exponential backoff between failed polls.
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Added to the long-poll wait to form the HTTP client timeout.
    #[serde(default = "default_request_timeout_margin_secs")]
    pub request_timeout_margin_secs: u64,

    /// Approve every gate without contacting the channel.
    #[serde(default)]
    pub skip: bool,
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_poll_timeout_secs() -> u64 {
    5
}

fn default_max_backoff_secs() -> u64 {
    10
}

fn default_request_timeout_margin_secs() -> u64 {
    10
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            request_timeout_margin_secs: default_request_timeout_margin_secs(),
            skip: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file; stderr logging stays on either way.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
