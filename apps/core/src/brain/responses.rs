//! Canned reply selection.
//!
//! Replies come from tiered tables: one tier per sentiment band, each keyed by
//! intent label with a tier default, plus a media table keyed by attachment
//! type that takes precedence whenever the message carries attachments.

use std::collections::HashMap;

use super::sentiment::SentimentBand;

/// Replies for one sentiment band.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTier {
    pub by_intent: HashMap<String, String>,
    pub fallback: String,
}

impl ResponseTier {
    fn new(entries: &[(&str, &str)], fallback: &str) -> Self {
        Self {
            by_intent: entries
                .iter()
                .map(|(intent, reply)| (intent.to_string(), reply.to_string()))
                .collect(),
            fallback: fallback.to_string(),
        }
    }

    pub fn reply_for(&self, intent: &str) -> &str {
        self.by_intent.get(intent).unwrap_or(&self.fallback)
    }
}

/// Replies for messages carrying attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaResponses {
    pub by_type: HashMap<String, String>,
    pub fallback: String,
}

impl MediaResponses {
    /// First reply matching an observed type, in observation order.
    pub fn reply_for<S: AsRef<str>>(&self, attachment_types: &[S]) -> &str {
        attachment_types
            .iter()
            .find_map(|kind| self.by_type.get(kind.as_ref()))
            .unwrap_or(&self.fallback)
    }
}

/// Maps (intent, sentiment, attachments) to a ready-to-send reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseGenerator {
    pub positive: ResponseTier,
    pub neutral: ResponseTier,
    pub negative: ResponseTier,
    pub media: MediaResponses,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self {
            positive: ResponseTier::new(
                &[
                    ("PRICING_QUERY", "Great! Our premium plans start at $99/month with amazing value. Would you like details?"),
                    ("CONTACT_REQUEST", "We'd love to connect! Reach us at contact@example.com or call 555-1234"),
                    ("APPOINTMENT", "Excellent! You can schedule an appointment at calendly.com/ourcompany"),
                    ("PRODUCT_INFO", "Wonderful! Our product features include... [details]"),
                ],
                "That's great to hear! How else can I assist you today?",
            ),
            neutral: ResponseTier::new(
                &[
                    ("PRICING_QUERY", "Our pricing starts at $99/month. Would you like more details?"),
                    ("CONTACT_REQUEST", "You can reach us at contact@example.com or call 555-1234"),
                    ("APPOINTMENT", "You can schedule an appointment at calendly.com/ourcompany"),
                    ("PRODUCT_INFO", "Our product features include... [details]"),
                ],
                "Thanks for your message! How can I help you today?",
            ),
            negative: ResponseTier::new(
                &[
                    ("PRICING_QUERY", "I notice some concerns about pricing. Our basic plan starts at just $49/month - would that work better?"),
                    ("CONTACT_REQUEST", "I apologize for any frustration. Please contact support@example.com for immediate assistance"),
                    ("APPOINTMENT", "I understand your frustration. Our manager will contact you shortly to resolve this"),
                    ("PRODUCT_INFO", "I apologize for any confusion. Let me clarify our product details..."),
                ],
                "I want to help resolve any issues. Could you share more details?",
            ),
            media: MediaResponses {
                by_type: [
                    ("image", "Thanks for sharing the image! Our team will review it shortly."),
                    ("video", "We've received your video. Thank you for sharing!"),
                    ("audio", "We'll listen to your audio message and get back to you."),
                    ("file", "We've received your file and will process it shortly."),
                ]
                .into_iter()
                .map(|(kind, reply)| (kind.to_string(), reply.to_string()))
                .collect(),
                fallback: "Thank you for sharing. We'll review your attachment and respond soon."
                    .to_string(),
            },
        }
    }
}

impl ResponseGenerator {
    pub fn tier(&self, band: SentimentBand) -> &ResponseTier {
        match band {
            SentimentBand::Positive => &self.positive,
            SentimentBand::Neutral => &self.neutral,
            SentimentBand::Negative => &self.negative,
        }
    }

    /// Pick the reply. Any attachment type overrides intent and sentiment.
    pub fn generate<S: AsRef<str>>(
        &self,
        intent: &str,
        sentiment_score: f64,
        attachment_types: &[S],
    ) -> String {
        if !attachment_types.is_empty() {
            return self.media.reply_for(attachment_types).to_string();
        }
        self.tier(SentimentBand::from_score(sentiment_score))
            .reply_for(intent)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ATTACHMENTS: [&str; 0] = [];

    #[test]
    fn test_tier_selection() {
        let generator = ResponseGenerator::default();
        assert!(generator
            .generate("PRICING_QUERY", 3.0, &NO_ATTACHMENTS)
            .starts_with("Great!"));
        assert!(generator
            .generate("PRICING_QUERY", 0.0, &NO_ATTACHMENTS)
            .starts_with("Our pricing"));
        assert!(generator
            .generate("PRICING_QUERY", -2.0, &NO_ATTACHMENTS)
            .contains("$49/month"));
    }

    #[test]
    fn test_unknown_intent_uses_tier_fallback() {
        let generator = ResponseGenerator::default();
        assert_eq!(
            generator.generate("GENERAL_QUERY", 0.0, &NO_ATTACHMENTS),
            generator.neutral.fallback
        );
    }

    #[test]
    fn test_media_observation_order() {
        let generator = ResponseGenerator::default();
        assert_eq!(
            generator.generate("PRICING_QUERY", 5.0, &["sticker", "video", "image"]),
            generator.media.by_type["video"]
        );
        assert_eq!(
            generator.generate("MEDIA", 0.0, &["location"]),
            generator.media.fallback
        );
    }
}
