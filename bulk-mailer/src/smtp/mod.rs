//! Outgoing SMTP delivery
//!
//! - [`types`]: SMTP account settings and the outgoing message shape
//! - [`transport`]: the [`MailTransport`] capability and its builder seam
//! - [`client`]: lettre-backed SMTP implementation
//! - [`mock`]: in-memory transport for tests and dry runs

pub mod client;
pub mod mock;
pub mod transport;
pub mod types;

pub use client::{SmtpMailer, SmtpTransportBuilder};
pub use mock::{MockTransport, MockTransportBuilder};
pub use transport::{MailTransport, TransportBuilder};
pub use types::{OutgoingMail, SmtpConfig, IMPLICIT_TLS_PORT};
