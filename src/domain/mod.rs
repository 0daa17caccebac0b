//! Domain Layer - Core types for the GlobalPay agent bridge
//!
//! Pure types and logic with no I/O. All agent interaction happens through
//! the ports layer.
//!
//! - `job`: job handle, lifecycle state machine, poll attempts
//! - `poll_policy`: attempt budget and inter-poll delay
//! - `chat`: caller-facing answer shape and offline replies
//! - `exchange_rate`: mock rate table and conversion

pub mod job;
pub mod poll_policy;
pub mod chat;
pub mod exchange_rate;

pub use job::{Job, JobId, JobState, JobStateError, PollAttempt, PollOutcome};
pub use poll_policy::{Backoff, PollPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
pub use chat::{AskResponse, AskStatus, offline_reply, DEFAULT_EMPTY_RESULT_MESSAGE, DEFAULT_FALLBACK_MESSAGE};
pub use exchange_rate::{ExchangeRate, RateError, RateSource, mock_rate, normalize_code};
