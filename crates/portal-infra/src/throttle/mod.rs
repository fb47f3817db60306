//! Submission throttling.

mod memory;

pub use memory::{InMemoryThrottle, RateLimitConfig};
