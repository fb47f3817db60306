//! Application state - shared across all handlers.

use std::sync::Arc;

use portal_core::ports::{BackendError, Mailer, PortalBackend, SubmissionThrottle};
use portal_infra::{BackendClient, LogMailer};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PortalBackend>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` disables throttling of the support endpoint.
    pub throttle: Option<Arc<dyn SubmissionThrottle>>,
    /// Key the throttle on forwarding headers instead of the peer address.
    pub trust_proxy: bool,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        let backend: Arc<dyn PortalBackend> = Arc::new(BackendClient::new(config.backend.clone())?);

        Ok(Self {
            backend,
            mailer: Self::mailer(config),
            throttle: Self::throttle(config),
            trust_proxy: config.trust_proxy,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    #[cfg(feature = "smtp")]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        use portal_infra::SmtpMailer;

        match config.smtp.as_ref().map(SmtpMailer::new) {
            Some(Ok(mailer)) => Arc::new(mailer),
            Some(Err(e)) => {
                tracing::error!(error = %e, "Invalid SMTP configuration. Using log-only mailer.");
                Arc::new(LogMailer::new())
            }
            None => {
                tracing::warn!("SMTP_HOST not set. Support tickets will only be logged.");
                Arc::new(LogMailer::new())
            }
        }
    }

    #[cfg(not(feature = "smtp"))]
    fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
        tracing::info!("Running without smtp feature - using log-only mailer");
        Arc::new(LogMailer::new())
    }

    #[cfg(feature = "rate-limit")]
    fn throttle(config: &AppConfig) -> Option<Arc<dyn SubmissionThrottle>> {
        Some(Arc::new(portal_infra::InMemoryThrottle::new(
            config.rate_limit.clone(),
        )))
    }

    #[cfg(not(feature = "rate-limit"))]
    fn throttle(_config: &AppConfig) -> Option<Arc<dyn SubmissionThrottle>> {
        None
    }
}
