//! Scripted Agent
//!
//! In-memory `AgentPort` that replays queued responses and records calls.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::agent::{AgentError, AgentPort, StatusReport};
use crate::domain::{ExchangeRate, JobId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted agent that records calls and replays queued responses.
///
/// Once the poll script runs dry every further poll reports "waiting".
#[derive(Debug)]
pub struct ScriptedAgent {
    start: Result<JobId, AgentError>,
    polls: Mutex<VecDeque<Result<StatusReport, AgentError>>>,
    start_calls: Mutex<Vec<String>>,
    poll_calls: Mutex<Vec<JobId>>,
    healthy: bool,
    rate: Option<ExchangeRate>,
}

impl Default for ScriptedAgent {
    fn default() -> Self {
        Self {
            start: Ok(JobId::new("job-1")),
            polls: Mutex::new(VecDeque::new()),
            start_calls: Mutex::new(Vec::new()),
            poll_calls: Mutex::new(Vec::new()),
            healthy: true,
            rate: None,
        }
    }
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the job handle returned by every start call
    pub fn with_job_id(mut self, id: &str) -> Self {
        self.start = Ok(JobId::new(id));
        self
    }

    /// Builder method to make every start call fail
    pub fn with_start_error(mut self, err: AgentError) -> Self {
        self.start = Err(err);
        self
    }

    /// Queue `n` "waiting" polls
    pub fn then_waiting(self, n: usize) -> Self {
        {
            let mut polls = lock(&self.polls);
            for _ in 0..n {
                polls.push_back(Ok(StatusReport::Waiting { status: "waiting".into() }));
            }
        }
        self
    }

    /// Queue a failed poll
    pub fn then_error(self, err: AgentError) -> Self {
        lock(&self.polls).push_back(Err(err));
        self
    }

    /// Queue a completed poll
    pub fn then_complete(self, result: Option<&str>) -> Self {
        lock(&self.polls).push_back(Ok(StatusReport::Complete {
            result: result.map(str::to_string),
        }));
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Rate returned by `exchange_rate`; without one the call fails
    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Queries passed to `start_job`
    pub fn start_calls(&self) -> Vec<String> {
        lock(&self.start_calls).clone()
    }

    /// Job ids passed to `poll_status`
    pub fn poll_calls(&self) -> Vec<JobId> {
        lock(&self.poll_calls).clone()
    }
}

#[async_trait]
impl AgentPort for ScriptedAgent {
    async fn start_job(&self, query: &str) -> Result<JobId, AgentError> {
        lock(&self.start_calls).push(query.to_string());
        self.start.clone()
    }

    async fn poll_status(&self, job_id: &JobId) -> Result<StatusReport, AgentError> {
        lock(&self.poll_calls).push(job_id.clone());
        lock(&self.polls)
            .pop_front()
            .unwrap_or_else(|| Ok(StatusReport::Waiting { status: "waiting".into() }))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    async fn exchange_rate(&self, _from: &str, _to: &str) -> Result<ExchangeRate, AgentError> {
        self.rate
            .clone()
            .ok_or_else(|| AgentError::Network("no rate scripted".into()))
    }
}
