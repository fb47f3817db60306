//! Mail port - delivery of support tickets to the support inbox.

use async_trait::async_trait;

use crate::domain::SupportTicket;

/// Mail transport - abstraction over SMTP and log-only delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the ticket as an HTML e-mail with its attachments.
    async fn send_ticket(&self, ticket: &SupportTicket) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
