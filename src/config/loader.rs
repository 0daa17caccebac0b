//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/bridge.toml.
//! Every section is optional; missing values fall back to the chat route's
//! defaults.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::agent_http::AgentHttpConfig;
use crate::application::BridgeMessages;
use crate::domain::{
    Backoff, PollPolicy, DEFAULT_EMPTY_RESULT_MESSAGE, DEFAULT_FALLBACK_MESSAGE,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};

/// Main configuration structure matching config/bridge.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub polling: PollingSection,
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Agent connection section
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// Agent base URL; unset means offline chat
    #[serde(default)]
    pub base_url: Option<String>,
    /// Optional bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AgentSection {
    /// Get base URL with environment variable override
    /// Checks AGENT_BASE_URL env var first, falls back to config value
    pub fn get_base_url(&self) -> Option<String> {
        std::env::var("AGENT_BASE_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .filter(|url| !url.trim().is_empty())
    }

    /// Get API key with environment variable fallback
    /// Checks AGENT_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("AGENT_API_KEY").ok().filter(|k| !k.is_empty())
    }

    /// HTTP client settings, or `None` when no agent is configured
    pub fn http_config(&self) -> Option<AgentHttpConfig> {
        let base_url = self.get_base_url()?;
        let mut config = AgentHttpConfig::new(base_url)
            .with_timeout(Duration::from_secs(self.request_timeout_secs));
        if let Some(key) = self.get_api_key() {
            config = config.with_api_key(key);
        }
        Some(config)
    }
}

/// Backoff mode for the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackoffMode {
    #[default]
    Fixed,
    Exponential,
}

/// Poll schedule section
#[derive(Debug, Clone, Deserialize)]
pub struct PollingSection {
    /// Delay between status checks in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Status checks before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub backoff: BackoffMode,
    /// Growth factor for exponential backoff
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Cap on a single delay for exponential backoff
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    /// Random extra delay upper bound (0 = none)
    #[serde(default)]
    pub jitter_ms: u64,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
            backoff: BackoffMode::Fixed,
            backoff_multiplier: default_backoff_multiplier(),
            max_interval_ms: default_max_interval_ms(),
            jitter_ms: 0,
        }
    }
}

/// Chat texts section
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSection {
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    #[serde(default = "default_empty_result_message")]
    pub empty_result_message: String,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            fallback_message: default_fallback_message(),
            empty_result_message: default_empty_result_message(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_interval_ms() -> u64 {
    10_000
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

fn default_empty_result_message() -> String {
    DEFAULT_EMPTY_RESULT_MESSAGE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, using defaults when the file does not exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        let config = Config::default();
        config.validate()?;
        return Ok(config);
    }
    load_config(path)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be >= 1".to_string(),
            ));
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "interval_ms must be > 0".to_string(),
            ));
        }

        if self.polling.backoff == BackoffMode::Exponential {
            if !(self.polling.backoff_multiplier >= 1.0) {
                return Err(ConfigError::ValidationError(format!(
                    "backoff_multiplier must be >= 1.0, got {}",
                    self.polling.backoff_multiplier
                )));
            }
            if self.polling.max_interval_ms < self.polling.interval_ms {
                return Err(ConfigError::ValidationError(format!(
                    "max_interval_ms ({}) must be >= interval_ms ({})",
                    self.polling.max_interval_ms, self.polling.interval_ms
                )));
            }
        }

        if let Some(ref url) = self.agent.base_url {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "base_url must start with http:// or https://, got '{}'",
                    url
                )));
            }
        }

        if self.agent.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.chat.fallback_message.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fallback_message cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl From<&PollingSection> for PollPolicy {
    fn from(section: &PollingSection) -> Self {
        let interval = Duration::from_millis(section.interval_ms);
        let backoff = match section.backoff {
            BackoffMode::Fixed => Backoff::Fixed,
            BackoffMode::Exponential => Backoff::Exponential {
                multiplier: section.backoff_multiplier,
                max_interval: Duration::from_millis(section.max_interval_ms),
            },
        };

        PollPolicy::fixed(interval, section.max_attempts)
            .with_backoff(backoff)
            .with_jitter(Duration::from_millis(section.jitter_ms))
    }
}

impl From<&ChatSection> for BridgeMessages {
    fn from(section: &ChatSection) -> Self {
        BridgeMessages {
            fallback: section.fallback_message.clone(),
            empty_result: section.empty_result_message.clone(),
        }
    }
}
