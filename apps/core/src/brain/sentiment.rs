//! Sentiment scoring.
//!
//! The pipeline only depends on the [`SentimentScorer`] trait. The bundled
//! [`LexiconSentiment`] sums AFINN-165 word valences, flipping the sign of a
//! word that directly follows a negator.

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::error::AppError;

/// Polarity estimate for one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentResult {
    /// Signed sum of word valences.
    pub score: f64,
    /// `score` divided by the number of tokens.
    pub comparative: f64,
    /// Tokens that contributed to the score.
    pub words: Vec<String>,
}

impl SentimentResult {
    /// Result used when there is no text to analyze.
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Coarse band used for response selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBand {
    /// `> 2` is positive, `< -1` is negative, everything else neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 2.0 {
            SentimentBand::Positive
        } else if score < -1.0 {
            SentimentBand::Negative
        } else {
            SentimentBand::Neutral
        }
    }
}

#[async_trait]
pub trait SentimentScorer: Send + Sync + 'static {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, AppError>;
}

const NEGATORS: &[&str] = &[
    "cant", "can't", "dont", "don't", "doesnt", "doesn't", "not", "non", "wont", "won't", "isnt",
    "isn't",
];

// NOTE: expect() is acceptable here: the pattern and the bundled table are compile-time constants.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.,/#!?$%\^&\*;:{}=_`"~()]"#).expect("Invalid regex: punctuation pattern")
});

static AFINN_165: LazyLock<Arc<HashMap<String, i32>>> = LazyLock::new(|| {
    let table: HashMap<String, i32> = serde_json::from_str(include_str!("../../data/afinn-165.json"))
        .expect("Invalid bundled AFINN-165 table");
    Arc::new(table)
});

/// Lowercase and split on whitespace after blanking punctuation.
/// Apostrophes and hyphens stay inside words, so `don't` is one token.
fn words(text: &str) -> Vec<String> {
    PUNCTUATION
        .replace_all(&text.to_lowercase(), " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Word-list sentiment scorer. Pure computation, never fails.
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    lexicon: Arc<HashMap<String, i32>>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    /// Scorer backed by the bundled AFINN-165 table.
    pub fn new() -> Self {
        Self {
            lexicon: Arc::clone(&AFINN_165),
        }
    }

    /// Scorer backed by a word list in the AFINN distribution format:
    /// one `word<TAB>score` pair per line.
    pub fn from_afinn_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let mut lexicon = HashMap::new();
        for (number, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = line
                .rsplit_once('\t')
                .and_then(|(word, score)| Some((word.trim(), score.trim().parse::<i32>().ok()?)));
            let Some((word, score)) = parsed else {
                return Err(AppError::Config(format!(
                    "Invalid sentiment lexicon entry at {}:{}",
                    path.display(),
                    number + 1
                )));
            };
            lexicon.insert(word.to_lowercase(), score);
        }
        info!(path = %path.display(), words = lexicon.len(), "Loaded sentiment lexicon");
        Ok(Self {
            lexicon: Arc::new(lexicon),
        })
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        let tokens = words(text);
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }

        let mut score = 0i32;
        let mut matched = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
            score += if negated { -valence } else { valence };
            matched.push(token.clone());
        }

        SentimentResult {
            score: f64::from(score),
            comparative: f64::from(score) / tokens.len() as f64,
            words: matched,
        }
    }
}

#[async_trait]
impl SentimentScorer for LexiconSentiment {
    async fn analyze(&self, text: &str) -> Result<SentimentResult, AppError> {
        Ok(self.score(text))
    }
}
