//! Chat Answers
//!
//! The caller-facing answer shape and the canned replies used when no agent
//! is configured.

use serde::{Deserialize, Serialize};

/// Apology shown whenever the agent round trip fails
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "I'm experiencing some technical difficulties right now. Please try again in a moment.";

/// Text used when the agent completes without any content
pub const DEFAULT_EMPTY_RESULT_MESSAGE: &str = "Process complete, but no response content.";

/// Outcome class of an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskStatus {
    Success,
    Error,
}

/// Answer returned to chat callers. `response_text` is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(rename = "response")]
    pub response_text: String,
    pub status: AskStatus,
    /// Diagnostic detail, present only on errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AskResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            response_text: text.into(),
            status: AskStatus::Success,
            error: None,
        }
    }

    /// Degraded answer: user-safe message plus the underlying detail
    pub fn degraded(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            response_text: message.into(),
            status: AskStatus::Error,
            error: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AskStatus::Success
    }
}

/// Keyword reply used in offline mode
pub fn offline_reply(query: &str) -> &'static str {
    let lower = query.to_lowercase();
    if lower.contains("payment") {
        "I can help with payments! What do you need?"
    } else if lower.contains("rate") {
        "The current exchange rate is competitive. How much would you like to convert?"
    } else {
        "Hello! How can I assist you with GlobalPay today?"
    }
}
