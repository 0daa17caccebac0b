//! Job Lifecycle
//!
//! A job is one query submitted to the external agent. The agent owns the
//! real state; this type only tracks what the bridge has observed so far.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque job handle issued by the agent.
///
/// The bridge never parses or inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where a job sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Created locally, start request not yet acknowledged
    Pending,
    /// Agent accepted the job, bridge is polling
    Polling,
    /// Agent reported completion
    Complete,
    /// Attempt budget ran out before completion
    TimedOut,
    /// Start request was rejected or malformed
    Failed,
}

impl JobState {
    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::TimedOut | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Polling => "polling",
            JobState::Complete => "complete",
            JobState::TimedOut => "timed_out",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Rejected state transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid job transition: {from} -> {to}")]
pub struct JobStateError {
    pub from: JobState,
    pub to: JobState,
}

/// One outstanding request to the agent
#[derive(Debug, Clone)]
pub struct Job {
    id: Option<JobId>,
    query: String,
    state: JobState,
}

impl Job {
    /// Create a job for a query that has not been sent yet
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            id: None,
            query: query.into(),
            state: JobState::Pending,
        }
    }

    /// Create a job for a handle obtained elsewhere (e.g. a previous `submit`)
    pub fn resume(id: JobId) -> Self {
        Self {
            id: Some(id),
            query: String::new(),
            state: JobState::Polling,
        }
    }

    pub fn id(&self) -> Option<&JobId> {
        self.id.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Pending -> Polling, recording the handle issued by the agent
    pub fn started(&mut self, id: JobId) -> Result<(), JobStateError> {
        self.transition(JobState::Pending, JobState::Polling)?;
        self.id = Some(id);
        Ok(())
    }

    /// Pending -> Failed
    pub fn start_failed(&mut self) -> Result<(), JobStateError> {
        self.transition(JobState::Pending, JobState::Failed)
    }

    /// Polling -> Complete
    pub fn completed(&mut self) -> Result<(), JobStateError> {
        self.transition(JobState::Polling, JobState::Complete)
    }

    /// Polling -> TimedOut
    pub fn timed_out(&mut self) -> Result<(), JobStateError> {
        self.transition(JobState::Polling, JobState::TimedOut)
    }

    fn transition(&mut self, expected: JobState, to: JobState) -> Result<(), JobStateError> {
        if self.state != expected {
            return Err(JobStateError { from: self.state, to });
        }
        self.state = to;
        Ok(())
    }
}

/// Result of a single status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Agent still working
    Waiting,
    /// Agent finished; content may be missing
    Complete(Option<String>),
    /// Status request itself failed (network or non-success HTTP)
    TransientError(String),
}

/// One status check against the agent. Not retained past the loop tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollAttempt {
    /// 1-based attempt counter
    pub attempt_number: u32,
    pub outcome: PollOutcome,
}
