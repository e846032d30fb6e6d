use serde::Serialize;
use std::fmt;
use std::io;
use thiserror::Error;

/// Questionnaire a screening answer vector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// 9-item depression questionnaire.
    Phq9,
    /// 7-item anxiety questionnaire.
    Gad7,
}

impl Instrument {
    /// Number of items on the questionnaire.
    pub fn item_count(&self) -> usize {
        match self {
            Instrument::Phq9 => 9,
            Instrument::Gad7 => 7,
        }
    }

    /// Highest attainable sum for the questionnaire.
    pub fn max_score(&self) -> u8 {
        // item_count is a small constant, the cast cannot truncate
        (self.item_count() as u8) * crate::risk::screening::MAX_ANSWER
    }

    /// Prefix used by submitted form fields (`phq9_1`, `gad7_7`, ...).
    pub fn field_prefix(&self) -> &'static str {
        match self {
            Instrument::Phq9 => "phq9",
            Instrument::Gad7 => "gad7",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Phq9 => write!(f, "PHQ-9"),
            Instrument::Gad7 => write!(f, "GAD-7"),
        }
    }
}

/// The constraint a screening answer vector broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The vector does not have exactly the instrument's item count.
    WrongLength { expected: usize, actual: usize },
    /// An answer lies outside 0..=3. `item` is 1-based.
    OutOfRange { item: usize, value: i64 },
    /// A form value could not be read as an integer. `item` is 1-based.
    NotAnInteger { item: usize, raw: String },
    /// A form field was absent. `item` is 1-based.
    MissingField { item: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::WrongLength { expected, actual } => {
                write!(f, "expected {} answers, got {}", expected, actual)
            }
            Violation::OutOfRange { item, value } => {
                write!(f, "item {} has value {} outside 0..=3", item, value)
            }
            Violation::NotAnInteger { item, raw } => {
                write!(f, "item {} value {:?} is not an integer", item, raw)
            }
            Violation::MissingField { item } => write!(f, "item {} is missing", item),
        }
    }
}

/// Malformed screening input. Always surfaced, never corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{instrument} answers rejected: {violation}")]
pub struct ValidationError {
    pub instrument: Instrument,
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(instrument: Instrument, violation: Violation) -> Self {
        Self {
            instrument,
            violation,
        }
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Screening answers that cannot be scored.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A chat message that is empty once trimmed.
    #[error("Empty message")]
    EmptyMessage,

    /// Missing or inconsistent configuration, detected when the engine is built.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external text completion service failed.
    #[error("Completion provider error: {0}")]
    Provider(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Validation(e) => AppError::Validation(e.clone()),
            AppError::EmptyMessage => AppError::EmptyMessage,
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Provider(s) => AppError::Provider(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Completion timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Invalid engine configuration: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(format!("HTTP error: {}", err))
    }
}
