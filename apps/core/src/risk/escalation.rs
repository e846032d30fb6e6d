//! Escalation: decides whether a verdict warrants an incident.
//!
//! Fires on a positive crisis verdict or a `high` screening tier. Every
//! qualifying event yields its own descriptor; deduplication and rate limiting
//! belong to the caller.

use chrono::Utc;

use super::config::EngineConfig;
use super::verdict::{CrisisVerdict, IncidentDescriptor, IncidentSource, RiskTier, ScreeningVerdict};
use crate::error::AppError;

pub struct EscalationCoordinator {
    default_responder: String,
}

impl EscalationCoordinator {
    pub fn new(config: &EngineConfig) -> Result<Self, AppError> {
        Self::with_responder(&config.default_responder)
    }

    pub fn with_responder(responder: &str) -> Result<Self, AppError> {
        let responder = responder.trim();
        if responder.is_empty() {
            return Err(AppError::Config("default responder is blank".to_string()));
        }
        Ok(Self {
            default_responder: responder.to_string(),
        })
    }

    /// Chat entry point. `message` becomes the incident summary.
    pub fn evaluate_crisis(
        &self,
        event_ref: &str,
        message: &str,
        verdict: &CrisisVerdict,
    ) -> Option<IncidentDescriptor> {
        if !verdict.is_crisis {
            return None;
        }
        Some(self.incident(
            IncidentSource::ChatMessage(event_ref.to_string()),
            message.to_string(),
        ))
    }

    /// Screening entry point.
    pub fn evaluate_screening(
        &self,
        event_ref: &str,
        verdict: &ScreeningVerdict,
    ) -> Option<IncidentDescriptor> {
        if verdict.risk_tier != RiskTier::High {
            return None;
        }
        Some(self.incident(
            IncidentSource::Screening(event_ref.to_string()),
            format!(
                "High risk screening result - PHQ-9: {}, GAD-7: {}",
                verdict.depression_score, verdict.anxiety_score
            ),
        ))
    }

    pub fn default_responder(&self) -> &str {
        &self.default_responder
    }

    fn incident(&self, source: IncidentSource, summary: String) -> IncidentDescriptor {
        IncidentDescriptor {
            source,
            summary,
            severity: RiskTier::High,
            assignee: self.default_responder.clone(),
            notify_counselor: true,
            created_at: Utc::now(),
        }
    }
}
