//! Poll Schedule
//!
//! How long the bridge waits between status checks and how many checks it
//! makes before giving up. Defaults reproduce the chat route's schedule:
//! 15 attempts, 2 seconds apart.

use std::time::Duration;

use rand::Rng;

/// Default delay between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default number of status checks before timing out
pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Backoff {
    /// Same delay every time
    #[default]
    Fixed,
    /// delay = interval * multiplier^(n-1), capped
    Exponential {
        multiplier: f64,
        max_interval: Duration,
    },
}

/// Attempt budget and inter-poll delay
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Base delay between consecutive attempts
    pub interval: Duration,
    /// Total status checks allowed (>= 1)
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Upper bound of random extra delay added to each sleep
    pub jitter: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Fixed,
            jitter: Duration::ZERO,
        }
    }
}

impl PollPolicy {
    /// Fixed schedule with custom interval and attempt count
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay to sleep after the given (1-based) attempt, before the next one.
    ///
    /// Returns `None` after the last attempt: the loop never sleeps once the
    /// budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }

        let base = self.base_delay(attempt);
        if self.jitter.is_zero() {
            return Some(base);
        }

        let extra_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        Some(base + Duration::from_millis(extra_ms))
    }

    /// Sum of all inter-attempt delays, excluding jitter and request latency
    pub fn total_delay(&self) -> Duration {
        (1..self.max_attempts).map(|n| self.base_delay(n)).sum()
    }

    /// Nominal budget callers should treat as the effective timeout:
    /// `max_attempts × interval` for the fixed schedule
    pub fn nominal_budget(&self) -> Duration {
        self.interval * self.max_attempts
    }

    fn base_delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { multiplier, max_interval } => {
                let factor = multiplier.powi(attempt.saturating_sub(1) as i32);
                let scaled = self.interval.as_secs_f64() * factor;
                let capped = scaled.min(max_interval.as_secs_f64());
                Duration::from_secs_f64(capped.max(0.0))
            }
        }
    }
}
