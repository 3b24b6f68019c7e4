//! Void detection and slip boilerplate notes.

use crate::models::config::ExtractionConfig;
use crate::models::receipt::TransactionStatus;

use super::lines::{contains_keyword, contains_phrase};

/// Classifies a slip as voided or completed and picks up the notes phrase.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    void_keywords: Vec<String>,
    notes_phrases: Vec<String>,
}

impl StatusClassifier {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            void_keywords: config.void_keywords.clone(),
            notes_phrases: config.notes_phrases.clone(),
        }
    }

    /// Replace the void keyword list.
    pub fn with_void_keywords(mut self, keywords: Vec<String>) -> Self {
        self.void_keywords = keywords;
        self
    }

    /// Replace the notes phrase list.
    pub fn with_notes_phrases(mut self, phrases: Vec<String>) -> Self {
        self.notes_phrases = phrases;
        self
    }

    /// Whether any void keyword appears in the text.
    pub fn is_void(&self, text: &str) -> bool {
        self.void_keywords
            .iter()
            .any(|k| contains_keyword(text, k, false))
    }

    pub fn classify(&self, text: &str) -> TransactionStatus {
        if self.is_void(text) {
            TransactionStatus::Void
        } else {
            TransactionStatus::Completed
        }
    }

    /// The first configured phrase found in the text, as configured.
    pub fn notes(&self, text: &str) -> Option<String> {
        self.notes_phrases
            .iter()
            .find(|p| contains_phrase(text, p))
            .map(|p| p.trim().to_string())
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}
