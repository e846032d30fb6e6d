//! Risk Engine - facade over classifier, scorer and coordinator.
//!
//! Built once from a validated [`EngineConfig`] and shared (it is immutable,
//! `Send + Sync`). Nothing here performs I/O, awaits, or logs.

use chrono::{DateTime, Utc};

use super::config::EngineConfig;
use super::crisis::CrisisClassifier;
use super::escalation::EscalationCoordinator;
use super::screening::{ScreeningScorer, ScreeningSubmission};
use super::verdict::{CrisisVerdict, IncidentDescriptor, ScreeningVerdict};
use crate::error::{AppError, ValidationError};

pub struct RiskEngine {
    classifier: CrisisClassifier,
    scorer: ScreeningScorer,
    coordinator: EscalationCoordinator,
}

impl RiskEngine {
    /// Validate the configuration and build all components.
    pub fn new(config: &EngineConfig) -> Result<Self, AppError> {
        config.check()?;
        Ok(Self {
            classifier: CrisisClassifier::new(config)?,
            scorer: ScreeningScorer::new(config)?,
            coordinator: EscalationCoordinator::new(config)?,
        })
    }

    /// Engine with the shipped defaults.
    pub fn with_defaults() -> Result<Self, AppError> {
        Self::new(&EngineConfig::default())
    }

    pub fn classify_crisis_text(&self, text: &str) -> CrisisVerdict {
        self.classifier.classify(text)
    }

    pub fn score_screening(
        &self,
        depression: &[i64],
        anxiety: &[i64],
    ) -> Result<ScreeningVerdict, ValidationError> {
        self.scorer.score_raw(depression, anxiety)
    }

    pub fn score_submission(&self, submission: &ScreeningSubmission) -> ScreeningVerdict {
        self.scorer.score(submission)
    }

    pub fn evaluate_crisis_escalation(
        &self,
        event_ref: &str,
        message: &str,
        verdict: &CrisisVerdict,
    ) -> Option<IncidentDescriptor> {
        self.coordinator.evaluate_crisis(event_ref, message, verdict)
    }

    pub fn evaluate_screening_escalation(
        &self,
        event_ref: &str,
        verdict: &ScreeningVerdict,
    ) -> Option<IncidentDescriptor> {
        self.coordinator.evaluate_screening(event_ref, verdict)
    }

    pub fn screening_retake_due(&self, last_taken: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        self.scorer.retake_due(last_taken, now)
    }

    pub fn classifier(&self) -> &CrisisClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &ScreeningScorer {
        &self.scorer
    }

    pub fn coordinator(&self) -> &EscalationCoordinator {
        &self.coordinator
    }
}
