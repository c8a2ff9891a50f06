use thiserror::Error;

#[derive(Error, Debug)]
pub enum BulkMailError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid SMTP configuration: {0}")]
    InvalidSmtpConfig(String),

    #[error("Failed to build SMTP transport: {0}")]
    Transport(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Message build error: {0}")]
    MessageBuild(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Send timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<::config::ConfigError> for BulkMailError {
    fn from(e: ::config::ConfigError) -> Self {
        BulkMailError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BulkMailError>;
