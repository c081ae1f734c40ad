//! Retry and failover bookkeeping for a single logical request.
//!
//! Two counters travel with each request as it is re-dispatched:
//! - `retry`: re-dispatches since the current backend selection failed
//! - `attempt`: backend selections made for this request
//!
//! A transport failure below the retry ceiling re-dispatches after a short
//! pause. At the ceiling the failed backend is marked dead and a new attempt
//! starts with a fresh retry budget. Past the attempt ceiling the request is
//! abandoned.

use std::time::Duration;

/// Re-dispatches allowed before the failed backend is abandoned.
pub const RETRY_CEILING: u32 = 3;

/// Backend selections allowed before the request is abandoned.
pub const ATTEMPT_CEILING: u32 = 3;

/// Fixed pause before a retry re-dispatch.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Upper bound on re-dispatches of one request.
pub const MAX_REDISPATCHES: u32 = ATTEMPT_CEILING * (RETRY_CEILING + 1);

/// Per-request escalation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationContext {
    retry: u32,
    attempt: u32,
}

impl Default for EscalationContext {
    fn default() -> Self {
        Self { retry: 0, attempt: 1 }
    }
}

/// What to do after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Pause, then re-dispatch with the bumped retry count.
    Retry(EscalationContext),
    /// Mark the failed backend dead, then re-dispatch as a new attempt.
    Failover(EscalationContext),
}

impl EscalationContext {
    pub fn new(attempt: u32, retry: u32) -> Self {
        Self { retry, attempt }
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// True once the request has used up every attempt.
    pub fn attempts_exhausted(&self) -> bool {
        self.attempt > ATTEMPT_CEILING
    }

    /// Number of re-dispatches this context represents.
    pub fn depth(&self) -> u32 {
        self.attempt
            .saturating_sub(1)
            .saturating_mul(RETRY_CEILING + 1)
            .saturating_add(self.retry)
    }

    /// Decide the next step after a transport failure.
    pub fn on_transport_failure(self) -> Escalation {
        let next = if self.retry < RETRY_CEILING {
            Escalation::Retry(Self {
                retry: self.retry + 1,
                attempt: self.attempt,
            })
        } else {
            Escalation::Failover(Self {
                retry: 0,
                attempt: self.attempt.saturating_add(1),
            })
        };

        debug_assert!(
            self.attempts_exhausted() || next.context().depth() <= MAX_REDISPATCHES,
            "escalation exceeded {MAX_REDISPATCHES} re-dispatches: {next:?}"
        );
        next
    }
}

impl Escalation {
    /// The context the re-dispatch runs with.
    pub fn context(&self) -> EscalationContext {
        match self {
            Escalation::Retry(ctx) | Escalation::Failover(ctx) => *ctx,
        }
    }
}
