use crate::error::RequestError;
use crate::traits::Sleeper;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Retry knobs for one HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    /// Growth after a 5xx response.
    pub server_error_growth: f64,
    /// Growth after any other failure.
    pub other_error_growth: f64,
    /// Minimum backoff once a 429 has been seen in the call.
    pub rate_limit_floor_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 2000,
            server_error_growth: 2.0,
            other_error_growth: 1.5,
            rate_limit_floor_ms: 5000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff_ms,
            ..Default::default()
        }
    }

    /// Fresh state machine for one call.
    pub fn start(&self) -> Backoff {
        Backoff::new(*self)
    }
}

/// How a failed attempt is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    RateLimited,
    ServerError,
    Other,
}

impl FailureClass {
    pub fn of(error: &RequestError) -> Self {
        if error.is_rate_limited() {
            FailureClass::RateLimited
        } else if error.is_server_error() {
            FailureClass::ServerError
        } else {
            FailureClass::Other
        }
    }
}

/// Retry state for a single call: attempts made so far and the next wait.
///
/// `current_ms` only ever grows: growth factors are clamped to >= 1 and the
/// rate-limit floor is applied with `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
    current_ms: f64,
    floor_ms: f64,
}

impl Backoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            attempt: 1,
            current_ms: policy.base_backoff_ms as f64,
            floor_ms: 0.0,
            policy,
        }
    }

    /// One-based number of the attempt currently in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts.max(1)
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms.max(self.floor_ms) as u64)
    }

    /// Records a failed attempt.
    ///
    /// Returns the wait before the next attempt, or `None` when attempts are
    /// exhausted and the error must be surfaced.
    pub fn on_failure(&mut self, class: FailureClass) -> Option<Duration> {
        if class == FailureClass::RateLimited {
            self.floor_ms = self.floor_ms.max(self.policy.rate_limit_floor_ms as f64);
        }
        self.current_ms = self.current_ms.max(self.floor_ms);

        if self.attempt >= self.max_attempts() {
            return None;
        }

        let wait = self.current();
        let growth = match class {
            FailureClass::ServerError => self.policy.server_error_growth,
            FailureClass::RateLimited | FailureClass::Other => self.policy.other_error_growth,
        };
        self.current_ms *= growth.max(1.0);
        self.attempt += 1;
        Some(wait)
    }
}

/// Real-time sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
