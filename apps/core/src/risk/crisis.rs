//! Crisis text classification.
//!
//! Scans a message for self-harm and suicide language in English and Hindi.
//! The decision is binary: the action it drives (showing emergency contacts)
//! is binary too.

use regex::Regex;
use std::sync::LazyLock;

use super::config::{EngineConfig, MatchMode};
use super::verdict::CrisisVerdict;
use crate::error::AppError;

static STARTS_WITH_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w").expect("Invalid regex: leading word character"));
static ENDS_WITH_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w$").expect("Invalid regex: trailing word character"));

/// Pattern for `phrase` in word-boundary mode. Only ends that are word
/// characters get a `\b`; a boundary next to punctuation would never match
/// once the punctuation is followed by a space or the end of the text.
fn word_boundary_source(phrase: &str) -> String {
    let lead = if STARTS_WITH_WORD.is_match(phrase) { r"\b" } else { "" };
    let trail = if ENDS_WITH_WORD.is_match(phrase) { r"\b" } else { "" };
    format!("{}{}{}", lead, regex::escape(phrase), trail)
}

/// A trigger phrase, normalized once.
struct Trigger {
    phrase: String,
    /// Present only in word-boundary mode.
    pattern: Option<Regex>,
}

impl Trigger {
    fn matches(&self, text_lower: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(text_lower),
            None => text_lower.contains(self.phrase.as_str()),
        }
    }
}

/// Phrase-containment classifier.
pub struct CrisisClassifier {
    triggers: Vec<Trigger>,
    safety_message: String,
}

impl CrisisClassifier {
    /// Build from configuration. Fails if no usable phrase remains.
    pub fn new(config: &EngineConfig) -> Result<Self, AppError> {
        Self::with_phrases(
            &config.crisis_phrases,
            config.match_mode,
            config.contacts.render(&config.safety_message),
        )
    }

    /// Build from an explicit phrase list.
    pub fn with_phrases(
        phrases: &[String],
        mode: MatchMode,
        safety_message: String,
    ) -> Result<Self, AppError> {
        let mut triggers = Vec::with_capacity(phrases.len());

        for phrase in phrases {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            let pattern = match mode {
                MatchMode::Substring => None,
                MatchMode::WordBoundary => {
                    let source = word_boundary_source(&phrase);
                    let regex = Regex::new(&source).map_err(|e| {
                        AppError::Config(format!("crisis phrase {:?}: {}", phrase, e))
                    })?;
                    Some(regex)
                }
            };
            triggers.push(Trigger { phrase, pattern });
        }

        if triggers.is_empty() {
            return Err(AppError::Config(
                "crisis phrase set is empty".to_string(),
            ));
        }

        Ok(Self {
            triggers,
            safety_message,
        })
    }

    /// Classify a message. Total over all strings.
    pub fn classify(&self, text: &str) -> CrisisVerdict {
        if text.is_empty() {
            return CrisisVerdict::clear();
        }

        let text_lower = text.to_lowercase();
        self.triggers
            .iter()
            .find(|trigger| trigger.matches(&text_lower))
            .map(|trigger| CrisisVerdict::crisis(&trigger.phrase, &self.safety_message))
            .unwrap_or_else(CrisisVerdict::clear)
    }

    /// Number of active trigger phrases.
    pub fn phrase_count(&self) -> usize {
        self.triggers.len()
    }
}
