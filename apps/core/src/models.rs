use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::AppError;

/// Messaging platform a contact was first seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Whatsapp,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "whatsapp" => Ok(Platform::Whatsapp),
            other => Err(AppError::Config(format!("Unknown platform: {}", other))),
        }
    }
}

/// A persistent identity for a messaging-platform user (a "lead").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// The unique identifier for the contact (UUID).
    pub id: String,
    /// The platform-scoped sender identifier. Unique across the system.
    pub channel_id: String,
    /// The platform the contact was first seen on.
    pub platform: Platform,
    /// Optional email address, never set by the pipeline itself.
    #[serde(default)]
    pub email: Option<String>,
    /// Unix timestamp of when the contact was created.
    pub created_at: i64,
}

/// One immutable entry of a contact's interaction log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interaction {
    pub id: i64,
    /// The ID of the contact this interaction belongs to.
    pub contact_id: String,
    /// The original text, or a placeholder for non-text content.
    pub message: String,
    /// Denormalized intent label (classifier output, `MEDIA` or `BROADCAST`).
    pub intent: String,
    pub sentiment_score: Option<f64>,
    pub sentiment_comparative: Option<f64>,
    /// Free-form payload capturing the original event.
    pub metadata: Json<Value>,
    /// Unix timestamp of when the interaction was recorded.
    pub created_at: i64,
}

/// An interaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub contact_id: String,
    pub message: String,
    pub intent: String,
    pub sentiment_score: Option<f64>,
    pub sentiment_comparative: Option<f64>,
    pub metadata: Value,
}

// --- Inbound webhook shapes ---

/// Envelope of one webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<InboundEntry>,
}

impl WebhookPayload {
    pub fn is_page_event(&self) -> bool {
        self.object == "page"
    }
}

/// One entry of a webhook delivery.
///
/// Events stay as raw JSON so a single malformed event can be skipped
/// without rejecting the whole entry, and so the original fields survive
/// into the interaction metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundEntry {
    #[serde(default)]
    pub messaging: Vec<Value>,
}

/// Typed view over a raw messaging event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Option<Sender>,
    pub message: Option<InboundMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Sender ids arrive as strings, but numeric ids are accepted as well.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!(
            "sender id must be a string or a number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<InboundAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    pub url: Option<String>,
}

/// Normalized attachment descriptor stored in interaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&InboundAttachment> for AttachmentDescriptor {
    fn from(attachment: &InboundAttachment) -> Self {
        Self {
            kind: attachment.kind.clone(),
            url: attachment.payload.as_ref().and_then(|p| p.url.clone()),
        }
    }
}

/// An attachment to deliver through the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Operator request to send one message to many contacts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BroadcastRequest {
    /// Channel identifiers of the recipients.
    #[serde(rename = "leadIds")]
    #[validate(length(min = 1, message = "leadIds must not be empty"))]
    pub lead_ids: Vec<String>,
    /// The text to send to every recipient.
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attachment_descriptor_omits_missing_url() {
        let attachment: InboundAttachment =
            serde_json::from_value(json!({ "type": "location" })).unwrap();
        let descriptor = AttachmentDescriptor::from(&attachment);
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), json!({ "type": "location" }));
    }

    #[test]
    fn test_broadcast_request_rejects_empty_ids() {
        let request: BroadcastRequest =
            serde_json::from_value(json!({ "leadIds": [], "message": "hi" })).unwrap();
        assert!(request.validate().is_err());

        let request: BroadcastRequest =
            serde_json::from_value(json!({ "leadIds": ["1"], "message": "hi" })).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_sender_id_accepts_numbers() {
        let event: MessagingEvent =
            serde_json::from_value(json!({ "sender": { "id": 1234567890123456u64 } })).unwrap();
        assert_eq!(event.sender.unwrap().id, "1234567890123456");

        let event: MessagingEvent =
            serde_json::from_value(json!({ "sender": { "id": "psid-1" } })).unwrap();
        assert_eq!(event.sender.unwrap().id, "psid-1");

        let result = serde_json::from_value::<MessagingEvent>(json!({ "sender": { "id": true } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("whatsapp".parse::<Platform>().unwrap(), Platform::Whatsapp);
        assert!("telegram".parse::<Platform>().is_err());
    }
}
