//! Brain Module Tests
//!
//! Classification, sentiment banding and reply selection working together.

use crate::brain::{
    tokenize, IntentClassifier, IntentTable, ResponseGenerator, SentimentBand, GENERAL_QUERY,
};
use std::sync::Arc;

fn classifier(json: &str) -> IntentClassifier {
    IntentClassifier::new(Arc::new(IntentTable::from_json(json).expect("valid table")))
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = IntentClassifier::default();
        let tokens = tokenize("Can I book an appointment to discuss pricing and cost?");
        let first = classifier.classify(&tokens);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&tokens), first);
        }
    }

    #[test]
    fn test_score_equal_to_threshold_does_not_win() {
        let classifier = classifier(
            r#"[{ "name": "GREETING", "keywords": ["hello", "hi"], "threshold": 0.5 }]"#,
        );
        let result = classifier.classify(&tokenize("hello there"));
        assert_eq!(result.intent, GENERAL_QUERY);
        assert_eq!(result.score, 0.0);

        let result = classifier.classify(&tokenize("hello hi"));
        assert_eq!(result.intent, "GREETING");
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_synonyms_are_scoped_to_their_intent() {
        // "quote" expands to "price" only while scoring PRICING.
        let classifier = classifier(
            r#"[
                { "name": "PRICING", "keywords": ["price", "plan"], "synonyms": { "quote": ["price"] }, "threshold": 0.4 },
                { "name": "SUPPORT", "keywords": ["price", "help"], "threshold": 0.4 }
            ]"#,
        );
        let result = classifier.classify(&tokenize("quote please"));
        assert_eq!(result.intent, "PRICING");
        assert_eq!(result.score, 0.5);

        let support = &classifier.table().definitions()[1];
        assert_eq!(support.score(&tokenize("quote please")), 0.0);
    }

    #[test]
    fn test_earlier_intent_wins_ties() {
        let classifier = classifier(
            r#"[
                { "name": "FIRST", "keywords": ["demo"], "threshold": 0.5 },
                { "name": "SECOND", "keywords": ["demo"], "threshold": 0.5 }
            ]"#,
        );
        assert_eq!(classifier.classify(&tokenize("demo")).intent, "FIRST");
    }

    #[test]
    fn test_builtin_table_needs_dense_keywords() {
        // One pricing keyword out of seven stays under the 0.7 threshold.
        let result = IntentClassifier::default().classify(&tokenize("how much does this cost?"));
        assert_eq!(result.intent, GENERAL_QUERY);
    }

    #[test]
    fn test_slash_joined_keywords_classify_as_pricing() {
        // price expands to price, cost, rate, fee; cost and fee add one each.
        let result = IntentClassifier::default().classify(&tokenize("price/cost/fee?"));
        assert_eq!(result.intent, "PRICING_QUERY");
        assert!((result.score - 6.0 / 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_can_exceed_one() {
        let classifier = classifier(
            r#"[{ "name": "PRICING", "keywords": ["price"], "synonyms": { "price": ["price"] }, "threshold": 0.5 }]"#,
        );
        let result = classifier.classify(&tokenize("price"));
        assert_eq!(result.intent, "PRICING");
        assert_eq!(result.score, 2.0);
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        assert!(IntentTable::from_json(r#"[{ "name": "X", "keywords": [], "threshold": 0.5 }]"#).is_err());
        assert!(IntentTable::from_json(r#"[{ "name": "X", "keywords": ["a"], "threshold": 1.5 }]"#).is_err());
        assert!(IntentTable::from_json("not json").is_err());
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn test_band_edges_stay_neutral() {
        assert_eq!(SentimentBand::from_score(2.0), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_score(-1.0), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_score(3.0), SentimentBand::Positive);
        assert_eq!(SentimentBand::from_score(-2.0), SentimentBand::Negative);
    }

    #[test]
    fn test_attachments_override_intent_and_sentiment() {
        let responses = ResponseGenerator::default();
        let image = "Thanks for sharing the image! Our team will review it shortly.";
        for intent in ["PRICING_QUERY", "APPOINTMENT", GENERAL_QUERY] {
            for score in [-5.0, 0.0, 5.0] {
                assert_eq!(responses.generate(intent, score, &["image"]), image);
            }
        }
    }

    #[test]
    fn test_tier_follows_sentiment() {
        let responses = ResponseGenerator::default();
        let none: [&str; 0] = [];
        assert_eq!(
            responses.generate("PRICING_QUERY", 0.0, &none),
            "Our pricing starts at $99/month. Would you like more details?"
        );
        assert!(responses.generate("PRICING_QUERY", 4.0, &none).starts_with("Great!"));
        assert!(responses.generate("PRICING_QUERY", -3.0, &none).contains("$49/month"));
        assert_eq!(
            responses.generate("UNKNOWN", 0.0, &none),
            "Thanks for your message! How can I help you today?"
        );
    }

    #[test]
    fn test_unknown_attachment_type_uses_media_fallback() {
        let responses = ResponseGenerator::default();
        assert_eq!(
            responses.generate(GENERAL_QUERY, 0.0, &["location"]),
            "Thank you for sharing. We'll review your attachment and respond soon."
        );
        assert_eq!(
            responses.generate(GENERAL_QUERY, 0.0, &["location", "video"]),
            "We've received your video. Thank you for sharing!"
        );
    }
}
