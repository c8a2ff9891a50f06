//! Batch dispatcher
//!
//! Runs on the caller's task. Inside a batch every send is polled
//! concurrently with `join_all`; the batch boundary is a synchronization point
//! and outcomes are folded into the report only after all of them settled.

use crate::batch::{DeliveryOutcome, DispatchOptions, SendReport, SendRequest};
use crate::error::{BulkMailError, Result};
use crate::smtp::{MailTransport, OutgoingMail, TransportBuilder};
use crate::templates::{EmailTemplate, Recipient, TemplateRenderer};
use futures::future::join_all;
use tracing::{debug, error, info, warn};

/// Sends a templated message to every recipient, batch by batch
#[derive(Debug, Clone, Default)]
pub struct BatchDispatcher {
    options: DispatchOptions,
}

impl BatchDispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Handle a whole send request
    ///
    /// Builds exactly one transport from `request.smtp`, then dispatches.
    ///
    /// # Errors
    /// Only when the transport cannot be constructed. Individual message
    /// failures end up in [`SendReport::failed_emails`].
    pub async fn send_all(
        &self,
        builder: &dyn TransportBuilder,
        request: &SendRequest,
    ) -> Result<SendReport> {
        let transport = builder.build(&request.smtp).map_err(|e| {
            error!("Failed to build SMTP transport for {}: {}", request.smtp.host, e);
            e
        })?;

        info!(
            "Sending to {} recipients via {}",
            request.recipients.len(),
            transport.describe()
        );

        let report = self
            .dispatch(
                transport.as_ref(),
                &request.smtp.from,
                &request.recipients,
                &request.template(),
            )
            .await;

        info!(
            "Send finished: {} delivered, {} failed",
            report.success_count,
            report.failed_count()
        );

        Ok(report)
    }

    /// Send `template` to `recipients` through an already built transport
    pub async fn dispatch(
        &self,
        transport: &dyn MailTransport,
        from: &str,
        recipients: &[Recipient],
        template: &EmailTemplate,
    ) -> SendReport {
        let mut report = SendReport::default();
        let batch_size = self.options.batch_size.max(1); // chunks panics on 0
        let batch_count = self.options.batch_count(recipients.len());

        for (index, batch) in recipients.chunks(batch_size).enumerate() {
            debug!(
                "Batch {}/{}: {} recipients",
                index + 1,
                batch_count,
                batch.len()
            );

            // Whole batch in flight, wait for every send
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|recipient| self.deliver(transport, from, template, recipient)),
            )
            .await;

            for outcome in outcomes {
                report.record(outcome);
            }

            // No pause after the last batch
            if index + 1 < batch_count {
                tokio::time::sleep(self.options.batch_delay).await;
            }
        }

        report
    }

    /// Render and send one message, never failing the caller
    async fn deliver(
        &self,
        transport: &dyn MailTransport,
        from: &str,
        template: &EmailTemplate,
        recipient: &Recipient,
    ) -> DeliveryOutcome {
        // Never reaches the transport
        let Some(to) = recipient.email() else {
            warn!("Recipient has no email field, skipping");
            return DeliveryOutcome::failed("", "recipient has no email field");
        };

        let missing = TemplateRenderer::missing_variables(template, recipient);
        if !missing.is_empty() {
            debug!("Unfilled placeholders for {}: {:?}", to, missing);
        }

        let (subject, html) = TemplateRenderer::render_template(template, recipient);
        let mail = OutgoingMail {
            from: from.to_string(),
            to: to.to_string(),
            subject,
            html,
        };

        // Elapsed timeout counts as a send failure
        let result = match self.options.send_timeout {
            Some(limit) => tokio::time::timeout(limit, transport.send_mail(&mail))
                .await
                .unwrap_or(Err(BulkMailError::Timeout(limit))),
            None => transport.send_mail(&mail).await,
        };

        match result {
            Ok(()) => {
                debug!("Sent to {}", to);
                DeliveryOutcome::delivered(to)
            }
            Err(e) => {
                warn!("Failed to send to {}: {}", to, e);
                DeliveryOutcome::failed(to, e.to_string())
            }
        }
    }
}
