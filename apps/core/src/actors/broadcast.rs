use crate::actors::traits::Collaborators;
use crate::brain::BROADCAST;
use crate::error::AppError;
use crate::models::NewInteraction;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

/// A recipient whose delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastFailure {
    pub recipient: String,
    pub error: String,
}

/// Aggregate outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
    /// Deliveries recorded as an interaction.
    pub logged: usize,
    pub failed: Vec<BroadcastFailure>,
    /// Delivered, but no interaction was recorded (unknown contact or log failure).
    pub unlogged: Vec<String>,
}

/// Sends one operator message to many recipients, one at a time.
#[derive(Clone)]
pub struct BroadcastDispatcher {
    collaborators: Collaborators,
}

impl BroadcastDispatcher {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Folds the recipient list into a report. A failed recipient never stops the fold.
    #[instrument(skip(self, recipients, message), fields(recipients = recipients.len()))]
    pub async fn broadcast(&self, recipients: &[String], message: &str) -> BroadcastReport {
        let report = stream::iter(recipients)
            .fold(BroadcastReport::default(), move |report, recipient| {
                self.deliver_one(report, recipient, message)
            })
            .await;

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            logged = report.logged,
            failed = report.failed.len(),
            unlogged = report.unlogged.len(),
            "Broadcast finished"
        );
        report
    }

    async fn deliver_one(
        &self,
        mut report: BroadcastReport,
        recipient: &str,
        message: &str,
    ) -> BroadcastReport {
        report.attempted += 1;

        if let Err(e) = self.collaborators.transport.send_text(recipient, message).await {
            warn!(recipient, "Failed to send broadcast: {}", e);
            report.failed.push(BroadcastFailure {
                recipient: recipient.to_string(),
                error: e.to_string(),
            });
            return report;
        }
        report.delivered += 1;

        match self.log_delivery(recipient, message).await {
            Ok(true) => report.logged += 1,
            Ok(false) => {
                warn!(recipient, "Broadcast delivered to unknown contact, not logged");
                report.unlogged.push(recipient.to_string());
            }
            Err(e) => {
                error!(recipient, "Broadcast delivered but logging failed: {}", e);
                report.unlogged.push(recipient.to_string());
            }
        }
        report
    }

    /// Returns `Ok(false)` when no contact matches the recipient.
    async fn log_delivery(&self, recipient: &str, message: &str) -> Result<bool, AppError> {
        let Some(contact) = self
            .collaborators
            .contacts
            .find_by_channel_id(recipient)
            .await?
        else {
            return Ok(false);
        };

        self.collaborators
            .interactions
            .append(NewInteraction {
                contact_id: contact.id,
                message: message.to_string(),
                intent: BROADCAST.to_string(),
                sentiment_score: None,
                sentiment_comparative: None,
                metadata: json!({ "type": "broadcast" }),
            })
            .await?;
        Ok(true)
    }
}
