//! Application configuration loaded from environment variables.

use std::env;

use portal_infra::BackendConfig;
#[cfg(feature = "rate-limit")]
use portal_infra::RateLimitConfig;
#[cfg(feature = "smtp")]
use portal_infra::SmtpConfig;

/// Largest accepted support upload (all parts together), in bytes.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
    /// `None` when `SMTP_HOST` is unset; tickets are then only logged.
    #[cfg(feature = "smtp")]
    pub smtp: Option<SmtpConfig>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    /// Trust `Forwarded` / `X-Forwarded-For` for the client address. Only
    /// safe behind a proxy that overwrites them.
    pub trust_proxy: bool,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            backend: BackendConfig::from_env(),
            #[cfg(feature = "smtp")]
            smtp: SmtpConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
            trust_proxy: env::var("TRUST_PROXY")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
