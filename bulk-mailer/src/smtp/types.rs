//! SMTP account settings and outgoing message types

use crate::error::{BulkMailError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Port on which the server expects TLS from the first byte (SMTPS)
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP account supplied by the user for one send request
///
/// All fields are strings as submitted by the form. `port` also accepts a JSON
/// number.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Jane <jane@example.com>`
    pub from: String,
}

impl SmtpConfig {
    /// Parse the port field
    pub fn port_number(&self) -> Result<u16> {
        self.port.trim().parse::<u16>().map_err(|e| {
            BulkMailError::InvalidSmtpConfig(format!("invalid port '{}': {}", self.port, e))
        })
    }

    /// True when the port selects implicit TLS rather than STARTTLS
    pub fn uses_implicit_tls(&self) -> bool {
        matches!(self.port_number(), Ok(IMPLICIT_TLS_PORT))
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(s) => s,
        Port::Number(n) => n.to_string(),
    })
}

/// A fully rendered message ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// HTML body
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: port.to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
            from: "sender@example.com".to_string(),
        }
    }

    #[test]
    fn test_implicit_tls_only_on_465() {
        assert!(config("465").uses_implicit_tls());
        assert!(!config("587").uses_implicit_tls());
        assert!(!config("25").uses_implicit_tls());
        assert!(!config("not-a-port").uses_implicit_tls());
    }

    #[test]
    fn test_port_number_rejects_garbage() {
        assert_eq!(config(" 587 ").port_number().unwrap(), 587);
        assert!(config("").port_number().is_err());
        assert!(config("70000").port_number().is_err());
    }

    #[test]
    fn test_port_accepts_string_or_number() {
        let from_string: SmtpConfig = serde_json::from_str(
            r#"{"host":"h","port":"465","username":"u","password":"p","from":"f@x.com"}"#,
        )
        .unwrap();
        let from_number: SmtpConfig = serde_json::from_str(
            r#"{"host":"h","port":587,"username":"u","password":"p","from":"f@x.com"}"#,
        )
        .unwrap();

        assert_eq!(from_string.port, "465");
        assert_eq!(from_number.port, "587");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", config("587"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
