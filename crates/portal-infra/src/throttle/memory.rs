//! In-memory per-client throttle using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use portal_core::ports::{Admission, SubmissionThrottle, ThrottleError};

/// Throttle configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum submissions per window, per client.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Tracked clients above which idle ones are forgotten.
    pub max_tracked: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
            max_tracked: 10_000,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
            max_tracked: std::env::var("RATE_LIMIT_MAX_TRACKED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tracked),
        }
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(self.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// GCRA throttle keyed by client address.
///
/// Note: Limits are per-process, not shared across instances. Clients whose
/// window has fully elapsed are dropped once more than `max_tracked` are held.
pub struct InMemoryThrottle {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    max_tracked: usize,
}

impl InMemoryThrottle {
    pub fn new(config: RateLimitConfig) -> Self {
        tracing::info!(
            max_requests = config.max_requests,
            window_secs = config.window.as_secs(),
            "Submission throttle configured"
        );
        Self {
            limiter: RateLimiter::keyed(config.quota()),
            clock: DefaultClock::default(),
            max_tracked: config.max_tracked,
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    /// Clients currently held by the limiter.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    fn prune(&self) {
        let before = self.limiter.len();
        if before <= self.max_tracked {
            return;
        }
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(before, after = self.limiter.len(), "Throttle state pruned");
    }
}

#[async_trait]
impl SubmissionThrottle for InMemoryThrottle {
    async fn admit(&self, client: &str) -> Result<Admission, ThrottleError> {
        let checked = self.limiter.check_key(&client.to_string());
        self.prune();
        match checked {
            Ok(()) => Ok(Admission::Allowed),
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(self.clock.now());
                tracing::warn!(client, retry_after_ms = retry_after.as_millis() as u64, "Submission throttled");
                Ok(Admission::Throttled { retry_after })
            }
        }
    }
}
