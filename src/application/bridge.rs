//! Request/Poll Bridge
//!
//! Turns the agent's asynchronous start/poll protocol into one bounded call.
//!
//! Polling is strictly sequential: attempt N+1 is only issued after attempt N
//! has answered and the inter-poll delay has elapsed. Start failures are
//! fatal; status-call transport failures are logged and cost one attempt.
//! Dropping the returned future stops further polls at the next await point.

use thiserror::Error;

use crate::domain::{
    AskResponse, Job, JobId, JobStateError, PollAttempt, PollOutcome, PollPolicy,
    DEFAULT_EMPTY_RESULT_MESSAGE, DEFAULT_FALLBACK_MESSAGE,
};
use crate::ports::{AgentError, AgentPort, StatusReport};

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Agent rejected or errored on job creation
    #[error("Agent start request failed: {0}")]
    StartFailed(AgentError),
    /// Start response carried no usable job handle
    #[error("Agent did not return a valid request_id")]
    MissingJobId,
    /// Attempt budget exhausted; the job may still be running
    #[error("Request timed out after {attempts} attempts; the agent took too long to respond (job {job_id})")]
    Timeout { job_id: JobId, attempts: u32 },
    /// Anything else: malformed payloads, unusable URLs
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<JobStateError> for BridgeError {
    fn from(err: JobStateError) -> Self {
        BridgeError::Unexpected(err.to_string())
    }
}

/// User-facing texts used when building answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeMessages {
    /// Apology returned on any failure
    pub fallback: String,
    /// Returned when the agent completes without content
    pub empty_result: String,
}

impl Default for BridgeMessages {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK_MESSAGE.to_string(),
            empty_result: DEFAULT_EMPTY_RESULT_MESSAGE.to_string(),
        }
    }
}

/// Bridge between chat callers and the agent
#[derive(Debug, Clone)]
pub struct RequestPollBridge<A> {
    agent: A,
    policy: PollPolicy,
    messages: BridgeMessages,
}

impl<A: AgentPort> RequestPollBridge<A> {
    /// Create a bridge with the default schedule (15 attempts, 2s apart)
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            policy: PollPolicy::default(),
            messages: BridgeMessages::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_messages(mut self, messages: BridgeMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// Send a query to the agent and return its job handle
    pub async fn submit(&self, query: &str) -> Result<JobId, BridgeError> {
        let mut job = Job::new(query);
        self.start(&mut job).await
    }

    /// Poll an existing job until it completes or the budget runs out
    pub async fn await_completion(&self, job_id: &JobId) -> Result<String, BridgeError> {
        let mut job = Job::resume(job_id.clone());
        self.poll_until_done(&mut job).await
    }

    /// Full round trip. Never fails: errors become a degraded answer.
    pub async fn ask(&self, query: &str) -> AskResponse {
        match self.run(query).await {
            Ok(text) => AskResponse::success(text),
            Err(e) => {
                tracing::warn!(error = %e, "Chat request degraded");
                AskResponse::degraded(self.messages.fallback.clone(), e.to_string())
            }
        }
    }

    /// submit + await_completion on a single job
    pub async fn run(&self, query: &str) -> Result<String, BridgeError> {
        let mut job = Job::new(query);
        self.start(&mut job).await?;
        self.poll_until_done(&mut job).await
    }

    async fn start(&self, job: &mut Job) -> Result<JobId, BridgeError> {
        let result = self.agent.start_job(job.query()).await;

        let job_id = match result {
            Ok(id) => id,
            Err(e) => {
                job.start_failed()?;
                tracing::error!(error = %e, "Agent start request failed");
                return Err(match e {
                    AgentError::MissingJobId => BridgeError::MissingJobId,
                    AgentError::Serialization(msg) => BridgeError::Unexpected(msg),
                    other => BridgeError::StartFailed(other),
                });
            }
        };

        job.started(job_id.clone())?;
        tracing::info!(job_id = %job_id, "Task started");
        Ok(job_id)
    }

    async fn poll_until_done(&self, job: &mut Job) -> Result<String, BridgeError> {
        let id = job
            .id()
            .cloned()
            .ok_or_else(|| BridgeError::Unexpected("job has no id to poll".to_string()))?;
        let job_id = &id;

        tracing::debug!(
            job_id = %job_id,
            max_attempts = self.policy.max_attempts,
            budget_ms = self.policy.nominal_budget().as_millis() as u64,
            max_sleep_ms = self.policy.total_delay().as_millis() as u64,
            "Waiting for agent result"
        );

        for attempt_number in 1..=self.policy.max_attempts {
            let attempt = self.poll_once(job_id, attempt_number).await?;

            match attempt.outcome {
                PollOutcome::Complete(result) => {
                    job.completed()?;
                    tracing::info!(job_id = %job_id, attempt = attempt_number, "Agent final response received");
                    return Ok(result.unwrap_or_else(|| self.messages.empty_result.clone()));
                }
                PollOutcome::Waiting => {}
                PollOutcome::TransientError(reason) => {
                    tracing::warn!(
                        job_id = %job_id,
                        attempt = attempt_number,
                        "Polling request failed: {}",
                        reason
                    );
                }
            }

            if let Some(delay) = self.policy.delay_after(attempt_number) {
                tokio::time::sleep(delay).await;
            }
        }

        job.timed_out()?;
        tracing::warn!(
            job_id = %job_id,
            attempts = self.policy.max_attempts,
            "Gave up waiting for agent"
        );
        Err(BridgeError::Timeout {
            job_id: job_id.clone(),
            attempts: self.policy.max_attempts,
        })
    }

    async fn poll_once(&self, job_id: &JobId, attempt_number: u32) -> Result<PollAttempt, BridgeError> {
        tracing::debug!(
            job_id = %job_id,
            "Polling for result... (attempt {}/{})",
            attempt_number,
            self.policy.max_attempts
        );

        let outcome = match self.agent.poll_status(job_id).await {
            Ok(StatusReport::Complete { result }) => PollOutcome::Complete(result),
            Ok(StatusReport::Waiting { status }) => {
                tracing::trace!(job_id = %job_id, %status, "Job still running");
                PollOutcome::Waiting
            }
            Err(e) if e.is_retryable() => PollOutcome::TransientError(e.to_string()),
            Err(e) => return Err(BridgeError::Unexpected(e.to_string())),
        };

        Ok(PollAttempt {
            attempt_number,
            outcome,
        })
    }
}
