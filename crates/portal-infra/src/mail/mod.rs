//! Support-ticket mail delivery.

mod log;
#[cfg(feature = "smtp")]
mod smtp;

pub use log::LogMailer;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpMailer};
