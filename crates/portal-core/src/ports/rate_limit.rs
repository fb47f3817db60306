//! Throttling port for endpoints that trigger outbound mail.

use async_trait::async_trait;
use std::time::Duration;

/// Submission throttle, keyed by client address.
#[async_trait]
pub trait SubmissionThrottle: Send + Sync {
    /// Record an attempt from `client` and report whether it may proceed.
    async fn admit(&self, client: &str) -> Result<Admission, ThrottleError>;
}

/// Outcome of [`SubmissionThrottle::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// Rejected; the caller may retry after the given delay.
    Throttled { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }

    /// Whole seconds for a `Retry-After` header, never zero.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Admission::Allowed => 0,
            Admission::Throttled { retry_after } => retry_after.as_secs().max(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThrottleError {
    #[error("Throttle backend error: {0}")]
    Backend(String),
}
