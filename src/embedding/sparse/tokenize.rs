//! Lexical tokenizer for the TF-IDF encoder.

use std::collections::HashSet;

use super::config::{SparseConfig, StopWords};

/// English function words dropped when [`StopWords::English`] is configured.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can",
    "need", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as",
    "into", "through", "during", "before", "after", "above", "below", "between", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all", "each", "few",
    "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so",
    "than", "too", "very", "just", "and", "but", "if", "or", "because", "until", "while", "what",
    "which", "who", "whom", "this", "that", "these", "those", "am", "it", "its", "i", "me", "my",
    "we", "our", "you", "your", "he", "him", "his", "she", "her", "they", "them", "their",
];

/// Splits text into terms.
///
/// A term is a run of alphanumeric characters, optionally joined by interior `-` or `'`
/// (`sci-fi`, `don't`). Leading and trailing joiners are stripped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    lowercase: bool,
    min_token_len: usize,
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    pub fn new(config: &SparseConfig) -> Self {
        let stop_words = match config.stop_words {
            StopWords::None => HashSet::new(),
            StopWords::English => ENGLISH_STOP_WORDS.iter().copied().collect(),
        };

        Self {
            lowercase: config.lowercase,
            min_token_len: config.min_token_len.max(1),
            stop_words,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        text.split(|c: char| !(c.is_alphanumeric() || is_joiner(c)))
            .map(|piece| piece.trim_matches(is_joiner))
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}

fn is_joiner(c: char) -> bool {
    c == '-' || c == '\''
}
