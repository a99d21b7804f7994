//! Outbound HTML email over SMTP.
//!
//! Independent of reminder recording: sending a message here does not touch
//! any case or reminder record.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{config, MailConfig};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport is not configured")]
    NotConfigured,

    #[error("invalid address for {0}: {1}")]
    InvalidAddress(&'static str, String),

    #[error("could not build message: {0}")]
    Build(String),

    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// Body of `POST /send-email`
#[derive(Debug, Clone, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let host = config.smtp_host.as_deref().ok_or(MailError::NotConfigured)?;
        let from = parse_mailbox("from", &config.from_address)?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self { transport: builder.build(), from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let to = parse_mailbox("to", &email.to)?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport.send(message).await.map_err(|e| {
            error!("SMTP delivery failed: {}", e);
            MailError::Transport(e.to_string())
        })?;
        info!("Sent email '{}'", email.subject);
        Ok(())
    }
}

fn parse_mailbox(field: &'static str, raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(field, raw.to_string()))
}

// Built on first use from the process configuration
static MAILER: Lazy<Option<Arc<dyn Mailer>>> = Lazy::new(|| {
    let mail = &config().mail;
    if !mail.is_configured() {
        return None;
    }
    match SmtpMailer::from_config(mail) {
        Ok(mailer) => Some(Arc::new(mailer) as Arc<dyn Mailer>),
        Err(e) => {
            error!("Mail transport disabled: {}", e);
            None
        }
    }
});

/// The process-wide mailer, if SMTP is configured
pub fn mailer() -> Result<Arc<dyn Mailer>, MailError> {
    MAILER.clone().ok_or(MailError::NotConfigured)
}

/// Validate and hand the message to `mailer`.
pub async fn send_email(mailer: &dyn Mailer, email: OutgoingEmail) -> Result<(), MailError> {
    parse_mailbox("to", &email.to)?;
    mailer.send(&email).await
}
