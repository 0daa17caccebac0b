//! Agent Port
//!
//! Interface to the external long-running agent. The agent accepts a query,
//! hands back an opaque job handle and later reports the job's status.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ExchangeRate, JobId};

/// Errors raised by agent calls
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    /// Agent answered with a non-success status code
    #[error("Agent returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection refused, DNS failure, reset...
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Start response had no usable job handle
    #[error("Agent did not return a valid request_id")]
    MissingJobId,

    /// Body was not the JSON we expected
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Request could not be built (bad base URL etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AgentError {
    /// Transport-level failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::Http { .. } | AgentError::Network(_) | AgentError::Timeout
        )
    }
}

/// Status reported by the agent for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// Still running; carries the raw status string for logging
    Waiting { status: String },
    /// Finished; the content may be absent
    Complete { result: Option<String> },
}

impl StatusReport {
    /// Map a raw status string. Only "complete" finishes a job.
    pub fn from_status(status: &str, result: Option<String>) -> Self {
        if status == "complete" {
            StatusReport::Complete { result }
        } else {
            StatusReport::Waiting { status: status.to_string() }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentPort: Send + Sync {
    /// Submit a query; returns the agent's job handle
    async fn start_job(&self, query: &str) -> Result<JobId, AgentError>;

    /// Check a job's status once
    async fn poll_status(&self, job_id: &JobId) -> Result<StatusReport, AgentError>;

    /// Liveness probe; never errors
    async fn health_check(&self) -> bool;

    /// Live exchange rate for a currency pair
    async fn exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate, AgentError>;
}

#[async_trait]
impl<T: AgentPort + ?Sized> AgentPort for Arc<T> {
    async fn start_job(&self, query: &str) -> Result<JobId, AgentError> {
        (**self).start_job(query).await
    }

    async fn poll_status(&self, job_id: &JobId) -> Result<StatusReport, AgentError> {
        (**self).poll_status(job_id).await
    }

    async fn health_check(&self) -> bool {
        (**self).health_check().await
    }

    async fn exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate, AgentError> {
        (**self).exchange_rate(from, to).await
    }
}
