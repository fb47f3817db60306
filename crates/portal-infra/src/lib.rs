//! # Portal Infrastructure
//!
//! Concrete implementations of the ports defined in `portal-core`:
//! session storage, the ERP backend client, mail delivery and submission
//! throttling.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No SMTP transport, no throttle; log-only mailer
//! - `smtp` - SMTP mail delivery via lettre
//! - `rate-limit` - Submission throttling via governor

pub mod backend;
pub mod debounce;
pub mod mail;
pub mod storage;

#[cfg(feature = "rate-limit")]
pub mod throttle;

pub use backend::{BackendClient, BackendConfig, whatsapp_link};
pub use debounce::Debouncer;
pub use mail::LogMailer;
pub use storage::{FileStore, InMemoryCookieJar, InMemoryStore};

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};

#[cfg(feature = "rate-limit")]
pub use throttle::{InMemoryThrottle, RateLimitConfig};
