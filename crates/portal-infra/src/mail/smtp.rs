//! SMTP mailer using lettre.

use async_trait::async_trait;
use chrono::Datelike;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use portal_core::domain::SupportTicket;
use portal_core::ports::{MailError, Mailer};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// SMTP configuration.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (usually port 465). Otherwise STARTTLS when offered.
    pub secure: bool,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_email: String,
    /// Support inbox that receives the tickets.
    pub recipient: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("from_email", &self.from_email)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl SmtpConfig {
    /// Load from environment. `None` when `SMTP_HOST` is not set.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;
        let username = std::env::var("SMTP_USER").unwrap_or_default();
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            secure: std::env::var("SMTP_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            password: std::env::var("SMTP_PASS").unwrap_or_default(),
            from_name: std::env::var("SMTP_FROM_NAME")
                .unwrap_or_else(|_| "Portal do Cliente MVK".to_string()),
            from_email: std::env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| username.clone()),
            recipient: std::env::var("SAC_DESTINO").unwrap_or_default(),
            username,
        })
    }
}

/// Sends each ticket as an HTML e-mail with the uploaded files attached.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from_address = config
            .from_email
            .parse::<Address>()
            .map_err(|e| MailError::Address(format!("SMTP_FROM_EMAIL: {e}")))?;
        let to = config
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("SAC_DESTINO: {e}")))?;

        let tls = TlsParameters::new(config.host.clone())
            .map_err(|e| MailError::Transport(e.to_string()))?;
        let tls = if config.secure {
            Tls::Wrapper(tls)
        } else {
            Tls::Opportunistic(tls)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!(host = %config.host, port = config.port, secure = config.secure, "SMTP mailer configured");
        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(Some(config.from_name.clone()), from_address),
            to,
        })
    }

    fn build_message(&self, ticket: &SupportTicket, year: i32) -> Result<Message, MailError> {
        let mut body = MultiPart::mixed().singlepart(SinglePart::html(ticket.render_html(year)));
        for file in &ticket.attachments {
            let content_type = ContentType::parse(&file.content_type)
                .or_else(|_| ContentType::parse(FALLBACK_CONTENT_TYPE))
                .map_err(|e| MailError::Build(e.to_string()))?;
            body = body.singlepart(
                Attachment::new(file.filename.clone()).body(file.content.clone(), content_type),
            );
        }

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(ticket.subject())
            .multipart(body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_ticket(&self, ticket: &SupportTicket) -> Result<(), MailError> {
        let message = self.build_message(ticket, chrono::Local::now().year())?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        tracing::info!(
            reference = %ticket.reference,
            attachments = ticket.attachments.len(),
            "Support ticket e-mailed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::domain::Attachment as TicketAttachment;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            secure: false,
            username: "portal@example.com".into(),
            password: "x".into(),
            from_name: "Portal".into(),
            from_email: "portal@example.com".into(),
            recipient: "sac@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_message_carries_attachments() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let ticket = SupportTicket {
            reference: "12345".into(),
            notes: "Caixa danificada".into(),
            attachments: vec![TicketAttachment {
                filename: "foto.jpg".into(),
                content_type: "image/jpeg".into(),
                content: vec![0xFF, 0xD8, 0xFF],
            }],
        };
        let message = mailer.build_message(&ticket, 2025).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(raw.contains("sac@example.com"));
        assert!(raw.contains("foto.jpg"));
        assert!(raw.contains("image/jpeg"));
    }

    #[test]
    fn test_bad_recipient_rejected() {
        let config = SmtpConfig {
            recipient: "not-an-address".into(),
            ..config()
        };
        assert!(matches!(SmtpMailer::new(&config), Err(MailError::Address(_))));
    }
}
