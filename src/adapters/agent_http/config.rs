//! Agent HTTP Configuration
//!
//! Connection settings for the external agent service.

use std::time::Duration;

/// Agent API paths, relative to the base URL
pub mod endpoints {
    /// Start a job (POST)
    pub const SEND_REQUEST: &str = "api/send-request";
    /// Job status (GET, job id appended as a path segment)
    pub const GET_RESPONSE: &str = "api/get-response";
    /// Exchange rate (GET, `from`/`to` query params)
    pub const EXCHANGE_RATE: &str = "api/exchange-rate";
    /// Liveness probe (GET)
    pub const HEALTH: &str = "health";
    /// Local development agent
    pub const LOCAL_DEFAULT: &str = "http://localhost:8001";
}

/// Agent client configuration
#[derive(Debug, Clone)]
pub struct AgentHttpConfig {
    /// Agent base URL, e.g. `http://localhost:8001`
    pub base_url: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Timeout used by the health probe
    pub health_timeout: Duration,
}

impl Default for AgentHttpConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::LOCAL_DEFAULT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(5),
        }
    }
}

impl AgentHttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set API key (sent as `Authorization: Bearer ...`)
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(key).filter(|k| !k.is_empty());
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
