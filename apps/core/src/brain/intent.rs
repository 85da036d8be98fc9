//! Intent classification by keyword matching.
//!
//! Each intent definition carries a keyword list, optional synonym expansions
//! and an acceptance threshold. Tokens are expanded with the synonyms of the
//! intent being scored, matched against its keywords, and the ratio of matches
//! to keywords is compared against the threshold.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use super::normalizer::normalize;
use crate::error::AppError;

/// Label returned when no intent clears its threshold.
pub const GENERAL_QUERY: &str = "GENERAL_QUERY";
/// Label for messages that carry attachments and no text.
pub const MEDIA: &str = "MEDIA";
/// Label for operator broadcasts.
pub const BROADCAST: &str = "BROADCAST";

/// Static definition of one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IntentDefinition {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub keywords: Vec<String>,
    /// Keyword -> alternate phrasings, only used while scoring this intent.
    #[serde(default)]
    pub synonyms: HashMap<String, Vec<String>>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: f64,
}

impl IntentDefinition {
    fn new(name: &str, keywords: &[&str], synonyms: &[(&str, &[&str])], threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            synonyms: synonyms
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
            threshold,
        }
    }

    /// Score normalized tokens against this definition.
    ///
    /// Unbounded above: synonym expansion can push the match count past the
    /// keyword count.
    pub fn score(&self, tokens: &[String]) -> f64 {
        let matches = tokens
            .iter()
            .flat_map(|token| {
                let expansions = self.synonyms.get(token).map(Vec::as_slice).unwrap_or(&[]);
                std::iter::once(token).chain(expansions.iter())
            })
            .filter(|candidate| self.keywords.iter().any(|k| k == *candidate))
            .count();

        matches as f64 / self.keywords.len() as f64
    }
}

/// Ordered, validated set of intent definitions. Declaration order breaks ties.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentTable {
    definitions: Vec<IntentDefinition>,
}

impl IntentTable {
    pub fn new(definitions: Vec<IntentDefinition>) -> Result<Self, AppError> {
        for definition in &definitions {
            definition.validate().map_err(|e| {
                AppError::Config(format!("Invalid intent '{}': {}", definition.name, e))
            })?;
        }
        Ok(Self { definitions })
    }

    /// Load a table from a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let definitions: Vec<IntentDefinition> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Invalid intent table: {}", e)))?;
        Self::new(definitions)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        info!(path = %path.display(), intents = table.len(), "Loaded intent table");
        Ok(table)
    }

    pub fn definitions(&self) -> &[IntentDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for IntentTable {
    /// The built-in lead qualification intents.
    fn default() -> Self {
        Self {
            definitions: vec![
                IntentDefinition::new(
                    "PRICING_QUERY",
                    &["price", "cost", "how much", "value", "rate", "fee", "pricing"],
                    &[
                        ("price", &["cost", "rate", "fee"]),
                        ("how much", &["what does it cost", "what is the price"]),
                    ],
                    0.7,
                ),
                IntentDefinition::new(
                    "CONTACT_REQUEST",
                    &["contact", "email", "phone", "call", "reach", "number"],
                    &[
                        ("contact", &["get in touch", "reach out"]),
                        ("phone", &["telephone", "cell", "mobile"]),
                    ],
                    0.6,
                ),
                IntentDefinition::new(
                    "APPOINTMENT",
                    &["schedule", "appointment", "meeting", "book", "reserve"],
                    &[],
                    0.65,
                ),
                IntentDefinition::new(
                    "PRODUCT_INFO",
                    &["product", "service", "feature", "spec", "detail"],
                    &[],
                    0.55,
                ),
            ],
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: String,
    /// Score of the winning intent, 0.0 for the default.
    pub score: f64,
}

/// Classifies token sequences against a shared intent table.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: Arc<IntentTable>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(IntentTable::default()))
    }
}

impl IntentClassifier {
    pub fn new(table: Arc<IntentTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &IntentTable {
        &self.table
    }

    /// Classify the intent of a token sequence.
    pub fn classify<S: AsRef<str>>(&self, tokens: &[S]) -> IntentResult {
        let tokens: Vec<String> = tokens.iter().map(|t| normalize(t.as_ref())).collect();

        let mut best = IntentResult {
            intent: GENERAL_QUERY.to_string(),
            score: 0.0,
        };

        for definition in self.table.definitions() {
            let score = definition.score(&tokens);
            // Strict on both sides: a score equal to the threshold or to the
            // current best never wins.
            if score > definition.threshold && score > best.score {
                best = IntentResult {
                    intent: definition.name.clone(),
                    score,
                };
            }
        }

        debug!(intent = %best.intent, score = best.score, "Classified intent");
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_synonym_expansion_inflates_score() {
        let table = IntentTable::default();
        let pricing = &table.definitions()[0];
        // "price" expands to price, cost, rate, fee: four keyword hits.
        let score = pricing.score(&tokens(&["price"]));
        assert!((score - 4.0 / 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_table_pricing() {
        let classifier = IntentClassifier::default();
        let result = classifier.classify(&["price", "cost", "rate"]);
        assert_eq!(result.intent, "PRICING_QUERY");
        assert!(result.score > 0.7);
    }

    #[test]
    fn test_empty_tokens_default() {
        let classifier = IntentClassifier::default();
        let empty: [&str; 0] = [];
        assert_eq!(classifier.classify(&empty).intent, GENERAL_QUERY);
    }

    #[test]
    fn test_table_validation() {
        let bad = IntentDefinition::new("EMPTY", &[], &[], 0.5);
        assert!(IntentTable::new(vec![bad]).is_err());

        let bad = IntentDefinition::new("HIGH", &["a"], &[], 1.5);
        assert!(IntentTable::new(vec![bad]).is_err());
    }
}
