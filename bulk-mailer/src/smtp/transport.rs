//! Mail transport abstraction

use crate::error::Result;
use crate::smtp::{OutgoingMail, SmtpConfig};
use std::sync::Arc;

/// A configured session able to deliver messages
///
/// One transport serves every message of a send request. Implementations must
/// allow concurrent calls to [`send_mail`](MailTransport::send_mail) through a
/// shared reference.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a single message
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Constructs a transport from user-supplied SMTP settings
///
/// Construction is the only step of a send request allowed to fail the whole
/// request.
pub trait TransportBuilder: Send + Sync {
    fn build(&self, config: &SmtpConfig) -> Result<Arc<dyn MailTransport>>;
}
