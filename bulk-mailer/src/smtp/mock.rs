//! Mock transport for testing
//!
//! Records every message it is asked to deliver and fails or stalls for
//! addresses registered up front. It also tracks how many sends were in
//! flight at once so batch concurrency can be observed.

use crate::error::{BulkMailError, Result};
use crate::smtp::{MailTransport, OutgoingMail, SmtpConfig, TransportBuilder};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A message seen by the mock, with the instant the send started
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub mail: OutgoingMail,
    pub started_at: Instant,
}

/// In-memory [`MailTransport`]
#[derive(Default)]
pub struct MockTransport {
    failing: HashSet<String>,
    stalling: HashSet<String>,
    latency: Option<Duration>,
    sent: Mutex<Vec<RecordedSend>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `address` return an error
    pub fn failing_for(mut self, address: impl Into<String>) -> Self {
        self.failing.insert(address.into());
        self
    }

    /// Sends to `address` never complete
    pub fn stalling_for(mut self, address: impl Into<String>) -> Self {
        self.stalling.insert(address.into());
        self
    }

    /// Every send takes `latency` before resolving
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Messages in the order their sends started
    pub fn sent(&self) -> Vec<RecordedSend> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Highest number of sends observed in flight at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MailTransport for MockTransport {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(RecordedSend {
                mail: mail.clone(),
                started_at: Instant::now(),
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.stalling.contains(&mail.to) {
            std::future::pending::<()>().await;
        }

        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        debug!("MockTransport: delivered to {}", mail.to);

        if self.failing.contains(&mail.to) {
            return Err(BulkMailError::Send(format!(
                "550 mailbox unavailable: {}",
                mail.to
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        "mock://".to_string()
    }
}

/// Hands out a shared [`MockTransport`], or refuses to build one
pub struct MockTransportBuilder {
    transport: Arc<MockTransport>,
    reject: Option<String>,
    builds: AtomicUsize,
}

impl MockTransportBuilder {
    pub fn new(transport: Arc<MockTransport>) -> Self {
        Self {
            transport,
            reject: None,
            builds: AtomicUsize::new(0),
        }
    }

    /// Every build fails with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject: Some(reason.into()),
            ..Self::new(Arc::new(MockTransport::new()))
        }
    }

    /// Number of transports built so far
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn transport(&self) -> Arc<MockTransport> {
        Arc::clone(&self.transport)
    }
}

impl TransportBuilder for MockTransportBuilder {
    fn build(&self, _config: &SmtpConfig) -> Result<Arc<dyn MailTransport>> {
        if let Some(reason) = &self.reject {
            return Err(BulkMailError::Transport(reason.clone()));
        }

        self.builds.fetch_add(1, Ordering::SeqCst);
        let transport: Arc<dyn MailTransport> = self.transport.clone();
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            from: "sender@example.com".to_string(),
            to: to.to_string(),
            subject: "Subject".to_string(),
            html: "<p>Body</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_and_fails() {
        let transport = MockTransport::new().failing_for("bad@example.com");

        assert!(transport.send_mail(&mail("good@example.com")).await.is_ok());
        assert!(transport.send_mail(&mail("bad@example.com")).await.is_err());

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].mail.to, "good@example.com");
        assert_eq!(transport.max_in_flight(), 1);
    }

    #[test]
    fn test_rejecting_builder() {
        let builder = MockTransportBuilder::rejecting("bad config");
        let config = SmtpConfig {
            host: "h".to_string(),
            port: "1".to_string(),
            username: String::new(),
            password: String::new(),
            from: "f@x.com".to_string(),
        };

        assert!(builder.build(&config).is_err());
        assert_eq!(builder.builds(), 0);
    }
}
