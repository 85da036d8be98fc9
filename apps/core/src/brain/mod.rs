//! # Brain Module
//!
//! Fast, deterministic analysis of inbound messages. No model, no network.
//!
//! ## Components
//! - `normalizer`: lowercasing, punctuation stripping, tokenization
//! - `intent`: keyword/synonym intent scoring against an injected table
//! - `sentiment`: sentiment scorer interface and the bundled lexicon scorer
//! - `responses`: sentiment- and attachment-aware reply tables

pub mod intent;
pub mod normalizer;
pub mod responses;
pub mod sentiment;

pub use intent::{
    IntentClassifier, IntentDefinition, IntentResult, IntentTable, BROADCAST, GENERAL_QUERY, MEDIA,
};
pub use normalizer::{normalize, tokenize};
pub use responses::{MediaResponses, ResponseGenerator, ResponseTier};
pub use sentiment::{LexiconSentiment, SentimentBand, SentimentResult, SentimentScorer};
