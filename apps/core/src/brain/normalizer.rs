//! Lexical normalization.
//!
//! [`tokenize`] lowercases text and splits it on runs of non-word characters,
//! so `price/cost` and `customer-service` yield two tokens each.
//! [`normalize`] is the per-token cleanup applied by the classifier.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable here: the patterns are compile-time constants.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Invalid regex: non-word pattern"));

static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("Invalid regex: word separator pattern"));

/// Lowercase `text` and strip punctuation.
pub fn normalize(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Lowercase `text` and split it into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    NON_WORD_RUN
        .split(&text.to_lowercase())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
