//! Outgoing email over SMTP.
//!
//! Handlers talk to a [`MailSender`] held in the application state. In
//! production that is an [`SmtpMailer`] built once at startup from
//! [`MailConfig`]; when no credentials are configured a [`DisabledMailer`]
//! takes its place and every send fails. Sends are attempted exactly once.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Subject line of messages sent from the admin contact form.
pub const ADMIN_SUBJECT: &str = "Message from ComplaintCare Admin";

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_NAME: &str = "ComplaintCare Admin";

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Email delivery is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Display name on the "From" header; the address is `username`.
    pub from_name: String,
}

impl MailConfig {
    /// Returns `None` unless both `EMAIL_USER` and `EMAIL_PASS` are set.
    ///
    /// | Variable         | Default               |
    /// |------------------|-----------------------|
    /// | `SMTP_HOST`      | `smtp.gmail.com`      |
    /// | `SMTP_PORT`      | `587`                 |
    /// | `EMAIL_USER`     | required              |
    /// | `EMAIL_PASS`     | required              |
    /// | `MAIL_FROM_NAME` | `ComplaintCare Admin` |
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("EMAIL_USER").ok()?;
        let password = std::env::var("EMAIL_PASS").ok()?;
        Some(Self {
            smtp_host: std::env::var("SMTP_HOST")
                .unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password,
            from_name: std::env::var("MAIL_FROM_NAME")
                .unwrap_or_else(|_| DEFAULT_FROM_NAME.to_string()),
        })
    }

    pub fn from_mailbox(&self) -> Result<Mailbox, EmailError> {
        Ok(Mailbox::new(
            Some(self.from_name.clone()),
            self.username.parse()?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    /// The message an administrator sends to a citizen from the contact form.
    pub fn admin_message(name: &str, email: &str, phone: &str, message: &str) -> Self {
        let html = format!(
            "<div>\n  <h2>Hello {name}</h2>\n  <p>{message}</p>\n  <p><b>Phone:</b> {phone}</p>\n  <p><b>Email:</b> {email}</p>\n</div>"
        );
        Self {
            to: email.to_string(),
            subject: ADMIN_SUBJECT.to_string(),
            html,
        }
    }
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from_mailbox()?,
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let response = self.transport.send(message).await?;
        tracing::info!(to = %email.to, code = %response.code(), "Email sent");
        Ok(())
    }
}

/// Stands in for SMTP when no credentials are configured.
pub struct DisabledMailer;

#[async_trait]
impl MailSender for DisabledMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        tracing::warn!(to = %email.to, "Dropping email: mail delivery is not configured");
        Err(EmailError::NotConfigured)
    }
}
