//! SMTP client for sending outgoing emails
//!
//! Wraps a lettre async transport. Port 465 connects with implicit TLS, any
//! other port upgrades the connection with STARTTLS.

use crate::error::{BulkMailError, Result};
use crate::smtp::{MailTransport, OutgoingMail, SmtpConfig, TransportBuilder};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::debug;

/// SMTP relay session built from a user's account settings
///
/// # Examples
/// ```no_run
/// use bulk_mailer::smtp::{MailTransport, OutgoingMail, SmtpConfig, SmtpMailer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = SmtpMailer::from_config(&SmtpConfig {
///     host: "smtp.example.com".to_string(),
///     port: "587".to_string(),
///     username: "me@example.com".to_string(),
///     password: "app-password".to_string(),
///     from: "Me <me@example.com>".to_string(),
/// })?;
///
/// mailer.send_mail(&OutgoingMail {
///     from: "Me <me@example.com>".to_string(),
///     to: "you@example.com".to_string(),
///     subject: "Hello".to_string(),
///     html: "<p>Hi!</p>".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
    implicit_tls: bool,
}

impl SmtpMailer {
    /// Build the transport without connecting
    ///
    /// # Errors
    /// Returns error if:
    /// - host is empty
    /// - port is not a valid port number
    /// - `from` is not a valid mailbox
    /// - TLS parameters cannot be created for the host
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let host = config.host.trim();
        if host.is_empty() {
            return Err(BulkMailError::InvalidSmtpConfig("host is empty".to_string()));
        }

        let port = config.port_number()?;
        parse_mailbox(&config.from).map_err(|e| {
            BulkMailError::InvalidSmtpConfig(format!("invalid from address: {}", e))
        })?;

        let implicit_tls = config.uses_implicit_tls();
        let builder = if implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| BulkMailError::Transport(e.to_string()))?
        .port(port);

        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
            host: host.to_string(),
            port,
            implicit_tls,
        })
    }

    pub fn implicit_tls(&self) -> bool {
        self.implicit_tls
    }

    fn build_message(mail: &OutgoingMail) -> Result<Message> {
        Message::builder()
            .from(parse_mailbox(&mail.from)?)
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|e| BulkMailError::MessageBuild(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        let message = Self::build_message(mail)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| BulkMailError::Send(e.to_string()))?;

        debug!("< {} for {}", response.code(), mail.to);
        Ok(())
    }

    fn describe(&self) -> String {
        let mode = if self.implicit_tls { "tls" } else { "starttls" };
        format!("smtp://{}:{} ({})", self.host, self.port, mode)
    }
}

/// Builds a [`SmtpMailer`] per request
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpTransportBuilder;

impl TransportBuilder for SmtpTransportBuilder {
    fn build(&self, config: &SmtpConfig) -> Result<Arc<dyn MailTransport>> {
        Ok(Arc::new(SmtpMailer::from_config(config)?))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| BulkMailError::InvalidEmail(format!("'{}': {}", address, e)))
}
