use crate::actors::traits::Collaborators;
use crate::brain::{tokenize, IntentClassifier, ResponseGenerator, SentimentResult, MEDIA};
use crate::error::AppError;
use crate::models::{
    AttachmentDescriptor, InboundAttachment, InboundEntry, MessagingEvent, NewInteraction, Platform,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Stored as the interaction message when an event carries no text.
pub const MEDIA_PLACEHOLDER: &str = "[media attachment]";

/// Per-batch tally returned to the webhook caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Events that were classified, logged and answered.
    pub processed: usize,
    /// Events with neither text nor attachments.
    pub skipped: usize,
    /// Events missing a sender or with an unexpected shape.
    pub malformed: usize,
    /// Events aborted by a collaborator failure.
    pub failed: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EventOutcome {
    Processed,
    Skipped,
    Malformed(String),
}

/// Runs each inbound event through classification, persistence and reply.
#[derive(Clone)]
pub struct IntakePipeline {
    classifier: IntentClassifier,
    responses: Arc<ResponseGenerator>,
    collaborators: Collaborators,
    platform: Platform,
}

impl IntakePipeline {
    pub fn new(
        classifier: IntentClassifier,
        responses: Arc<ResponseGenerator>,
        collaborators: Collaborators,
        platform: Platform,
    ) -> Self {
        Self {
            classifier,
            responses,
            collaborators,
            platform,
        }
    }

    /// Processes every messaging event of every entry, in arrival order.
    ///
    /// A failing event is logged and counted; the rest of the batch still runs.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn process_batch(&self, entries: &[InboundEntry]) -> BatchReport {
        let mut report = BatchReport::default();

        for raw in entries.iter().flat_map(|entry| entry.messaging.iter()) {
            match self.process_event(raw).await {
                Ok(EventOutcome::Processed) => report.processed += 1,
                Ok(EventOutcome::Skipped) => report.skipped += 1,
                Ok(EventOutcome::Malformed(reason)) => {
                    warn!(%reason, "Skipping malformed messaging event");
                    report.malformed += 1;
                }
                Err(e) => {
                    error!("Error processing messaging event: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            malformed = report.malformed,
            failed = report.failed,
            "Batch processed"
        );
        report
    }

    async fn process_event(&self, raw: &Value) -> Result<EventOutcome, AppError> {
        let event: MessagingEvent = match serde_json::from_value(raw.clone()) {
            Ok(event) => event,
            Err(e) => return Ok(EventOutcome::Malformed(e.to_string())),
        };

        let Some(sender_id) = event.sender.map(|s| s.id).filter(|id| !id.is_empty()) else {
            return Ok(EventOutcome::Malformed("missing sender id".to_string()));
        };

        let (text, attachments) = match event.message {
            Some(message) => (message.text.filter(|t| !t.is_empty()), message.attachments),
            None => (None, Vec::new()),
        };

        if text.is_none() && attachments.is_empty() {
            debug!(%sender_id, "Ignoring event without text or attachments");
            return Ok(EventOutcome::Skipped);
        }

        let (intent, sentiment) = match &text {
            Some(text) => {
                let tokens = tokenize(text);
                let intent = self.classifier.classify(tokens.as_slice()).intent;
                let sentiment = self.collaborators.sentiment.analyze(text).await?;
                (intent, sentiment)
            }
            None => (MEDIA.to_string(), SentimentResult::neutral()),
        };

        let contact = self
            .collaborators
            .contacts
            .find_or_create(&sender_id, self.platform)
            .await?;

        let descriptors: Vec<AttachmentDescriptor> =
            attachments.iter().map(AttachmentDescriptor::from).collect();

        self.collaborators
            .interactions
            .append(NewInteraction {
                contact_id: contact.id.clone(),
                message: text.clone().unwrap_or_else(|| MEDIA_PLACEHOLDER.to_string()),
                intent: intent.clone(),
                sentiment_score: Some(sentiment.score),
                sentiment_comparative: Some(sentiment.comparative),
                metadata: build_metadata(raw, &sentiment, &descriptors)?,
            })
            .await?;

        let attachment_types = observed_types(&attachments);
        let reply = self
            .responses
            .generate(&intent, sentiment.score, &attachment_types);

        self.collaborators
            .transport
            .send_text(&sender_id, &reply)
            .await?;

        info!(%sender_id, %intent, score = sentiment.score, "Replied to inbound message");
        Ok(EventOutcome::Processed)
    }
}

/// The raw event fields, followed by the full sentiment detail and the
/// normalized attachment descriptors.
fn build_metadata(
    raw: &Value,
    sentiment: &SentimentResult,
    attachments: &[AttachmentDescriptor],
) -> Result<Value, AppError> {
    let mut metadata = match raw {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    metadata.insert("sentiment".to_string(), serde_json::to_value(sentiment)?);
    metadata.insert("attachments".to_string(), serde_json::to_value(attachments)?);
    Ok(Value::Object(metadata))
}

/// Distinct attachment types in first-seen order.
fn observed_types(attachments: &[InboundAttachment]) -> Vec<&str> {
    let mut types: Vec<&str> = Vec::new();
    for attachment in attachments {
        if !types.contains(&attachment.kind.as_str()) {
            types.push(&attachment.kind);
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_observed_types_dedup_in_order() {
        let attachments: Vec<InboundAttachment> = serde_json::from_value(json!([
            { "type": "video" },
            { "type": "image" },
            { "type": "video" }
        ]))
        .unwrap();
        assert_eq!(observed_types(&attachments), vec!["video", "image"]);
    }

    #[test]
    fn test_metadata_shape() {
        let raw = json!({
            "sender": { "id": "7" },
            "timestamp": 1700000000,
            "message": { "mid": "m.1", "text": "hi" }
        });
        let sentiment = SentimentResult {
            score: 0.0,
            comparative: 0.0,
            words: vec![],
        };
        let descriptors = vec![AttachmentDescriptor {
            kind: "image".to_string(),
            url: Some("https://cdn.example.com/x.png".to_string()),
        }];

        let metadata = build_metadata(&raw, &sentiment, &descriptors).unwrap();

        assert_eq!(metadata["sender"]["id"], "7");
        assert_eq!(metadata["timestamp"], 1700000000);
        assert_eq!(metadata["sentiment"]["words"], json!([]));
        assert_eq!(
            metadata["attachments"],
            json!([{ "type": "image", "url": "https://cdn.example.com/x.png" }])
        );
        let keys: Vec<&String> = metadata.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["sender", "timestamp", "message", "sentiment", "attachments"]);
    }
}
