//! ERP backend client.

mod client;
mod config;
mod mapping;

pub use client::{BackendClient, FINANCE_WHATSAPP, whatsapp_link};
pub use config::{BackendConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HEALTH_TIMEOUT};
