//! Batch dispatch types

use crate::smtp::SmtpConfig;
use crate::templates::{EmailTemplate, Recipient};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recipients per batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pause between two consecutive batches
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Pacing knobs for [`BatchDispatcher`](crate::batch::BatchDispatcher)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Messages sent concurrently per batch
    pub batch_size: usize,
    /// Sleep between batches (never after the last one)
    pub batch_delay: Duration,
    /// Per-message limit; `None` waits for the transport indefinitely
    pub send_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            send_timeout: None,
        }
    }
}

impl DispatchOptions {
    /// Number of batches needed for `recipients` messages
    pub fn batch_count(&self, recipients: usize) -> usize {
        recipients.div_ceil(self.batch_size.max(1))
    }
}

/// Body of a send request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendRequest {
    pub recipients: Vec<Recipient>,
    pub subject: String,
    pub body: String,
    pub smtp: SmtpConfig,
}

impl SendRequest {
    pub fn template(&self) -> EmailTemplate {
        EmailTemplate::new(self.subject.clone(), self.body.clone())
    }
}

/// Result of one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Destination address, empty when the recipient had none
    pub email: String,
    /// Failure reason, `None` on success
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            error: None,
        }
    }

    pub fn failed(email: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of a whole send request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    pub success_count: usize,
    pub failed_emails: Vec<String>,
}

impl SendReport {
    /// Fold one outcome into the report
    pub fn record(&mut self, outcome: DeliveryOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failed_emails.push(outcome.email);
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed_emails.len()
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failed_count()
    }
}
