//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod backend;
mod mailer;
mod rate_limit;
mod storage;

pub use backend::{BackendError, PortalBackend};
pub use mailer::{MailError, Mailer};
pub use rate_limit::{Admission, SubmissionThrottle, ThrottleError};
pub use storage::{SessionStorage, StorageError};
