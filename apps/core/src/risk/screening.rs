//! PHQ-9 / GAD-7 screening.
//!
//! Answers are validated into a fixed-arity [`ScreeningSubmission`] at the
//! boundary; the scorer itself only ever sees well-formed input.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use super::config::{CategoryTable, EngineConfig, RecommendationSet, RiskRules};
use super::verdict::{RiskTier, ScreeningVerdict};
use crate::error::{AppError, Instrument, ValidationError, Violation};

/// Highest value a single questionnaire item can take.
pub const MAX_ANSWER: u8 = 3;

pub const PHQ9_ITEMS: usize = 9;
pub const GAD7_ITEMS: usize = 7;

/// One questionnaire answer, 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Answer(u8);

impl Answer {
    /// `item` is 1-based and only used for the error.
    pub fn new(instrument: Instrument, item: usize, value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if v <= MAX_ANSWER => Ok(Answer(v)),
            _ => Err(ValidationError::new(
                instrument,
                Violation::OutOfRange { item, value },
            )),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A complete, validated screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningSubmission {
    pub phq9: [Answer; PHQ9_ITEMS],
    pub gad7: [Answer; GAD7_ITEMS],
}

impl ScreeningSubmission {
    /// Validate raw integer vectors. Length is checked before range so a short
    /// vector is reported as such.
    pub fn from_raw(depression: &[i64], anxiety: &[i64]) -> Result<Self, ValidationError> {
        Ok(Self {
            phq9: answers::<PHQ9_ITEMS>(Instrument::Phq9, depression)?,
            gad7: answers::<GAD7_ITEMS>(Instrument::Gad7, anxiety)?,
        })
    }

    /// Read `phq9_1`..`phq9_9` and `gad7_1`..`gad7_7` from submitted form
    /// fields. Missing or non-numeric fields are rejected, never defaulted.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let depression = form_values(Instrument::Phq9, fields)?;
        let anxiety = form_values(Instrument::Gad7, fields)?;
        Self::from_raw(&depression, &anxiety)
    }

    pub fn depression_score(&self) -> u8 {
        self.phq9.iter().map(Answer::value).sum()
    }

    pub fn anxiety_score(&self) -> u8 {
        self.gad7.iter().map(Answer::value).sum()
    }
}

fn answers<const N: usize>(
    instrument: Instrument,
    raw: &[i64],
) -> Result<[Answer; N], ValidationError> {
    if raw.len() != N {
        return Err(ValidationError::new(
            instrument,
            Violation::WrongLength {
                expected: N,
                actual: raw.len(),
            },
        ));
    }

    let mut out = [Answer::default(); N];
    for (index, (slot, &value)) in out.iter_mut().zip(raw).enumerate() {
        *slot = Answer::new(instrument, index + 1, value)?;
    }
    Ok(out)
}

fn form_values(
    instrument: Instrument,
    fields: &HashMap<String, String>,
) -> Result<Vec<i64>, ValidationError> {
    (1..=instrument.item_count())
        .map(|item| {
            let key = format!("{}_{}", instrument.field_prefix(), item);
            let raw = fields.get(&key).ok_or_else(|| {
                ValidationError::new(instrument, Violation::MissingField { item })
            })?;
            raw.trim().parse::<i64>().map_err(|_| {
                ValidationError::new(
                    instrument,
                    Violation::NotAnInteger {
                        item,
                        raw: raw.clone(),
                    },
                )
            })
        })
        .collect()
}

/// Sums, categorizes and tiers a submission.
pub struct ScreeningScorer {
    depression_categories: CategoryTable,
    anxiety_categories: CategoryTable,
    rules: RiskRules,
    recommendations: RecommendationSet,
    retake_window: Duration,
}

impl ScreeningScorer {
    /// Build from configuration. Category tables must cover each
    /// instrument's full range.
    pub fn new(config: &EngineConfig) -> Result<Self, AppError> {
        config.depression_categories.check_covers(Instrument::Phq9)?;
        config.anxiety_categories.check_covers(Instrument::Gad7)?;

        let render = |list: &[String]| -> Vec<String> {
            list.iter().map(|s| config.contacts.render(s)).collect()
        };
        let recommendations = RecommendationSet {
            low: render(&config.recommendations.low),
            moderate: render(&config.recommendations.moderate),
            high: render(&config.recommendations.high),
        };

        let retake_window = Duration::try_days(config.retake_window_days).ok_or_else(|| {
            AppError::Config(format!(
                "retake window of {} days is out of range",
                config.retake_window_days
            ))
        })?;

        Ok(Self {
            depression_categories: config.depression_categories.clone(),
            anxiety_categories: config.anxiety_categories.clone(),
            rules: config.risk_rules.clone(),
            recommendations,
            retake_window,
        })
    }

    /// Score a validated submission.
    pub fn score(&self, submission: &ScreeningSubmission) -> ScreeningVerdict {
        let depression = submission.depression_score();
        let anxiety = submission.anxiety_score();
        let tier = self.risk_tier(depression, anxiety);

        ScreeningVerdict {
            depression_score: depression,
            anxiety_score: anxiety,
            depression_category: self.depression_categories.label_for(depression).to_string(),
            anxiety_category: self.anxiety_categories.label_for(anxiety).to_string(),
            risk_tier: tier,
            recommendations: self.recommendations_for(tier).to_vec(),
            scored_at: Utc::now(),
        }
    }

    /// Validate and score raw answer vectors.
    pub fn score_raw(
        &self,
        depression: &[i64],
        anxiety: &[i64],
    ) -> Result<ScreeningVerdict, ValidationError> {
        let submission = ScreeningSubmission::from_raw(depression, anxiety)?;
        Ok(self.score(&submission))
    }

    /// First matching rule wins: high, then moderate, else low.
    pub fn risk_tier(&self, depression: u8, anxiety: u8) -> RiskTier {
        let r = &self.rules;
        if depression >= r.high_depression
            || anxiety >= r.high_anxiety
            || (depression >= r.combined_depression && anxiety >= r.combined_anxiety)
        {
            RiskTier::High
        } else if depression >= r.moderate_depression || anxiety >= r.moderate_anxiety {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn depression_category(&self, score: u8) -> &str {
        self.depression_categories.label_for(score)
    }

    pub fn anxiety_category(&self, score: u8) -> &str {
        self.anxiety_categories.label_for(score)
    }

    pub fn recommendations_for(&self, tier: RiskTier) -> &[String] {
        match tier {
            RiskTier::Low => &self.recommendations.low,
            RiskTier::Moderate => &self.recommendations.moderate,
            RiskTier::High => &self.recommendations.high,
        }
    }

    /// Whether a student whose last screening was at `last_taken` may take
    /// it again at `now`.
    pub fn retake_due(&self, last_taken: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_taken {
            None => true,
            Some(last) => now - last >= self.retake_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ScreeningScorer {
        ScreeningScorer::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_sum_and_categories() {
        let verdict = scorer()
            .score_raw(&[1, 1, 1, 1, 1, 0, 0, 0, 0], &[2, 2, 2, 2, 2, 0, 0])
            .unwrap();
        assert_eq!(verdict.depression_score, 5);
        assert_eq!(verdict.anxiety_score, 10);
        assert_eq!(verdict.depression_category, "Mild");
        assert_eq!(verdict.anxiety_category, "Moderate");
        assert_eq!(verdict.risk_tier, RiskTier::Moderate);
    }

    #[test]
    fn test_depression_boundaries() {
        let s = scorer();
        assert_eq!(s.depression_category(0), "Minimal");
        assert_eq!(s.depression_category(4), "Minimal");
        assert_eq!(s.depression_category(5), "Mild");
        assert_eq!(s.depression_category(9), "Mild");
        assert_eq!(s.depression_category(10), "Moderate");
        assert_eq!(s.depression_category(14), "Moderate");
        assert_eq!(s.depression_category(15), "Moderately Severe");
        assert_eq!(s.depression_category(19), "Moderately Severe");
        assert_eq!(s.depression_category(20), "Severe");
        assert_eq!(s.depression_category(27), "Severe");
    }

    #[test]
    fn test_anxiety_boundaries() {
        let s = scorer();
        assert_eq!(s.anxiety_category(4), "Minimal");
        assert_eq!(s.anxiety_category(5), "Mild");
        assert_eq!(s.anxiety_category(14), "Moderate");
        assert_eq!(s.anxiety_category(15), "Severe");
        assert_eq!(s.anxiety_category(21), "Severe");
    }

    #[test]
    fn test_risk_tier_rules() {
        let s = scorer();
        assert_eq!(s.risk_tier(15, 10), RiskTier::High);
        assert_eq!(s.risk_tier(20, 0), RiskTier::High);
        assert_eq!(s.risk_tier(0, 15), RiskTier::High);
        assert_eq!(s.risk_tier(15, 9), RiskTier::Moderate);
        assert_eq!(s.risk_tier(14, 10), RiskTier::Moderate);
        assert_eq!(s.risk_tier(10, 0), RiskTier::Moderate);
        assert_eq!(s.risk_tier(9, 9), RiskTier::Low);
    }

    #[test]
    fn test_high_recommendations_name_contacts() {
        let recs = scorer().recommendations_for(RiskTier::High).to_vec();
        assert!(recs.iter().any(|r| r.contains("Dr. Priya Sharma") && r.contains("9152987821")));
        assert!(recs.iter().any(|r| r.contains("1800-599-0019")));
        assert!(recs.iter().all(|r| !r.contains('{')));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = scorer()
            .score_raw(&[0; 8], &[0; 7])
            .unwrap_err();
        assert_eq!(err.instrument, Instrument::Phq9);
        assert_eq!(
            err.violation,
            Violation::WrongLength {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = scorer()
            .score_raw(&[0; 9], &[0, 0, 0, 4, 0, 0, 0])
            .unwrap_err();
        assert_eq!(err.instrument, Instrument::Gad7);
        assert_eq!(err.violation, Violation::OutOfRange { item: 4, value: 4 });

        let err = scorer().score_raw(&[-1, 0, 0, 0, 0, 0, 0, 0, 0], &[0; 7]).unwrap_err();
        assert_eq!(err.violation, Violation::OutOfRange { item: 1, value: -1 });
    }

    #[test]
    fn test_form_extraction() {
        let mut fields = HashMap::new();
        for i in 1..=9 {
            fields.insert(format!("phq9_{}", i), "2".to_string());
        }
        for i in 1..=7 {
            fields.insert(format!("gad7_{}", i), " 1 ".to_string());
        }
        let submission = ScreeningSubmission::from_form(&fields).unwrap();
        assert_eq!(submission.depression_score(), 18);
        assert_eq!(submission.anxiety_score(), 7);

        fields.remove("gad7_3");
        let err = ScreeningSubmission::from_form(&fields).unwrap_err();
        assert_eq!(err.violation, Violation::MissingField { item: 3 });

        fields.insert("gad7_3".to_string(), "often".to_string());
        let err = ScreeningSubmission::from_form(&fields).unwrap_err();
        assert!(matches!(err.violation, Violation::NotAnInteger { item: 3, .. }));
    }

    #[test]
    fn test_retake_window() {
        let s = scorer();
        let now = Utc::now();
        assert!(s.retake_due(None, now));
        assert!(!s.retake_due(Some(now - Duration::days(3)), now));
        assert!(s.retake_due(Some(now - Duration::days(7)), now));
    }

    #[test]
    fn test_unrepresentable_retake_window_is_config_error() {
        let config = EngineConfig {
            retake_window_days: i64::MAX,
            ..EngineConfig::default()
        };
        assert!(matches!(ScreeningScorer::new(&config), Err(AppError::Config(_))));
    }
}
