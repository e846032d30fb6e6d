//! Verdicts - Output structures of the risk engine.
//!
//! Plain immutable values handed to the caller, who decides how to store
//! them and what to do next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse risk classification. Also used as incident severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of scanning one message for crisis language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisVerdict {
    pub is_crisis: bool,
    /// Set only when `is_crisis` is true.
    pub severity: Option<RiskTier>,
    /// Message naming who to contact. Set only when `is_crisis` is true.
    pub safety_message: Option<String>,
    /// The configured phrase that fired.
    pub matched_phrase: Option<String>,
}

impl CrisisVerdict {
    pub fn clear() -> Self {
        Self {
            is_crisis: false,
            severity: None,
            safety_message: None,
            matched_phrase: None,
        }
    }

    pub fn crisis(phrase: &str, safety_message: &str) -> Self {
        Self {
            is_crisis: true,
            severity: Some(RiskTier::High),
            safety_message: Some(safety_message.to_string()),
            matched_phrase: Some(phrase.to_string()),
        }
    }
}

/// Scored screening submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningVerdict {
    /// PHQ-9 sum, 0-27.
    pub depression_score: u8,
    /// GAD-7 sum, 0-21.
    pub anxiety_score: u8,
    pub depression_category: String,
    pub anxiety_category: String,
    pub risk_tier: RiskTier,
    pub recommendations: Vec<String>,
    pub scored_at: DateTime<Utc>,
}

impl ScreeningVerdict {
    /// Two verdicts agree on everything except when they were computed.
    pub fn same_outcome(&self, other: &ScreeningVerdict) -> bool {
        self.depression_score == other.depression_score
            && self.anxiety_score == other.anxiety_score
            && self.depression_category == other.depression_category
            && self.anxiety_category == other.anxiety_category
            && self.risk_tier == other.risk_tier
            && self.recommendations == other.recommendations
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "PHQ-9: {} ({}), GAD-7: {} ({}), Risk: {}",
            self.depression_score,
            self.depression_category,
            self.anxiety_score,
            self.anxiety_category,
            self.risk_tier
        )
    }
}

/// The event that caused an incident, referenced by the caller's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event_ref", rename_all = "snake_case")]
pub enum IncidentSource {
    ChatMessage(String),
    Screening(String),
}

/// Escalation produced for the caller to persist and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDescriptor {
    pub source: IncidentSource,
    pub summary: String,
    pub severity: RiskTier,
    pub assignee: String,
    pub notify_counselor: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::High > RiskTier::Moderate);
        assert!(RiskTier::Moderate > RiskTier::Low);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"high\"");
        assert_eq!(RiskTier::Moderate.to_string(), "moderate");
    }

    #[test]
    fn test_clear_verdict_has_no_details() {
        let verdict = CrisisVerdict::clear();
        assert!(!verdict.is_crisis);
        assert!(verdict.severity.is_none());
        assert!(verdict.safety_message.is_none());
    }

    #[test]
    fn test_incident_source_shape() {
        let json = serde_json::to_value(IncidentSource::Screening("scr-42".to_string())).unwrap();
        assert_eq!(json["kind"], "screening");
        assert_eq!(json["event_ref"], "scr-42");
    }
}
