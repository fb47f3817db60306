//! Log-only mailer - used when no SMTP server is configured.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use portal_core::domain::SupportTicket;
use portal_core::ports::{MailError, Mailer};

/// Tickets kept by a recording mailer; older ones are dropped first.
pub const RECORDED_TICKETS: usize = 32;

/// Logs tickets instead of sending them. Only a [`LogMailer::recording`]
/// mailer keeps them, and at most [`RECORDED_TICKETS`] of them.
#[derive(Default)]
pub struct LogMailer {
    recorded: Option<Mutex<VecDeque<SupportTicket>>>,
}

impl LogMailer {
    /// Log and drop every ticket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep the most recent tickets for inspection.
    pub fn recording() -> Self {
        Self {
            recorded: Some(Mutex::new(VecDeque::with_capacity(RECORDED_TICKETS))),
        }
    }

    /// Tickets "sent" so far, oldest first.
    pub fn sent(&self) -> Vec<SupportTicket> {
        self.recorded
            .as_ref()
            .map(|recorded| {
                recorded
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_ticket(&self, ticket: &SupportTicket) -> Result<(), MailError> {
        tracing::warn!(
            subject = %ticket.subject(),
            attachments = ticket.attachments.len(),
            "SMTP not configured, support ticket logged only"
        );
        if let Some(recorded) = &self.recorded {
            let mut recorded = recorded.lock().unwrap_or_else(|e| e.into_inner());
            if recorded.len() == RECORDED_TICKETS {
                recorded.pop_front();
            }
            recorded.push_back(ticket.clone());
        }
        Ok(())
    }
}
