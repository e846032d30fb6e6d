//! Engine configuration.
//!
//! Every phrase, threshold, table and message the engine uses is injected
//! through [`EngineConfig`]. `Default` carries the values the platform ships
//! with; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{AppError, Instrument};

/// How crisis phrases are matched against a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain containment. "die" also matches inside "diet".
    #[default]
    Substring,
    /// Phrase must start and end on a word boundary.
    WordBoundary,
}

/// One row of a category table: every score up to and including `max_score`
/// (and above the previous row) gets `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub max_score: u8,
    pub label: String,
}

impl SeverityBand {
    fn new(max_score: u8, label: &str) -> Self {
        Self {
            max_score,
            label: label.to_string(),
        }
    }
}

/// Ordered score bands for one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    pub bands: Vec<SeverityBand>,
}

impl CategoryTable {
    pub fn new(bands: Vec<SeverityBand>) -> Self {
        Self { bands }
    }

    /// PHQ-9 severity bands.
    pub fn phq9() -> Self {
        Self::new(vec![
            SeverityBand::new(4, "Minimal"),
            SeverityBand::new(9, "Mild"),
            SeverityBand::new(14, "Moderate"),
            SeverityBand::new(19, "Moderately Severe"),
            SeverityBand::new(27, "Severe"),
        ])
    }

    /// GAD-7 severity bands.
    pub fn gad7() -> Self {
        Self::new(vec![
            SeverityBand::new(4, "Minimal"),
            SeverityBand::new(9, "Mild"),
            SeverityBand::new(14, "Moderate"),
            SeverityBand::new(21, "Severe"),
        ])
    }

    /// Label for a score. Only call on a table that passed [`Self::check_covers`].
    pub fn label_for(&self, score: u8) -> &str {
        self.bands
            .iter()
            .find(|band| score <= band.max_score)
            .or_else(|| self.bands.last())
            .map(|band| band.label.as_str())
            .unwrap_or_default()
    }

    /// The bands must be non-empty, strictly ascending, carry non-empty
    /// labels, and reach the instrument's maximum score.
    pub fn check_covers(&self, instrument: Instrument) -> Result<(), AppError> {
        let Some(last) = self.bands.last() else {
            return Err(AppError::Config(format!(
                "{} category table is empty",
                instrument
            )));
        };

        if let Some(band) = self.bands.iter().find(|b| b.label.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "{} category band ending at {} has no label",
                instrument, band.max_score
            )));
        }

        if self
            .bands
            .windows(2)
            .any(|pair| pair[0].max_score >= pair[1].max_score)
        {
            return Err(AppError::Config(format!(
                "{} category bands are not strictly ascending",
                instrument
            )));
        }

        if last.max_score < instrument.max_score() {
            return Err(AppError::Config(format!(
                "{} category table stops at {}, scores reach {}",
                instrument,
                last.max_score,
                instrument.max_score()
            )));
        }

        Ok(())
    }
}

/// Thresholds for the risk tier, evaluated high first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRules {
    pub high_depression: u8,
    pub high_anxiety: u8,
    /// Combined clause: both of these reached together is also high.
    pub combined_depression: u8,
    pub combined_anxiety: u8,
    pub moderate_depression: u8,
    pub moderate_anxiety: u8,
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            high_depression: 20,
            high_anxiety: 15,
            combined_depression: 15,
            combined_anxiety: 10,
            moderate_depression: 10,
            moderate_anxiety: 10,
        }
    }
}

impl RiskRules {
    /// Every threshold must be reachable, and each instrument's single high
    /// threshold must sit at or above both its moderate and combined ones.
    pub fn check(&self) -> Result<(), AppError> {
        let per_instrument = [
            (
                Instrument::Phq9,
                self.high_depression,
                self.combined_depression,
                self.moderate_depression,
            ),
            (
                Instrument::Gad7,
                self.high_anxiety,
                self.combined_anxiety,
                self.moderate_anxiety,
            ),
        ];

        for (instrument, high, combined, moderate) in per_instrument {
            let max = instrument.max_score();
            if let Some(threshold) = [high, combined, moderate].into_iter().find(|t| *t > max) {
                return Err(AppError::Config(format!(
                    "{} risk threshold {} is above the maximum score {}",
                    instrument, threshold, max
                )));
            }
            if high < moderate {
                return Err(AppError::Config(format!(
                    "{} high threshold {} is below the moderate threshold {}",
                    instrument, high, moderate
                )));
            }
            if combined > high {
                return Err(AppError::Config(format!(
                    "{} combined threshold {} is above the high threshold {}",
                    instrument, combined, high
                )));
            }
        }
        Ok(())
    }
}

/// People and numbers named in crisis replies and high-risk guidance.
///
/// Message templates may reference them as `{counselor_name}`,
/// `{counselor_phone}`, `{helpline}` and `{emergency}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CrisisContacts {
    #[validate(length(min = 1))]
    pub counselor_name: String,
    #[validate(length(min = 1))]
    pub counselor_phone: String,
    #[validate(length(min = 1))]
    pub helpline: String,
    #[validate(length(min = 1))]
    pub emergency: String,
}

impl Default for CrisisContacts {
    fn default() -> Self {
        Self {
            counselor_name: "Dr. Priya Sharma".to_string(),
            counselor_phone: "9152987821".to_string(),
            helpline: "1800-599-0019".to_string(),
            emergency: "112".to_string(),
        }
    }
}

impl CrisisContacts {
    /// Substitute contact placeholders in a template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{counselor_name}", &self.counselor_name)
            .replace("{counselor_phone}", &self.counselor_phone)
            .replace("{helpline}", &self.helpline)
            .replace("{emergency}", &self.emergency)
    }
}

/// Fixed guidance lists, one per risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RecommendationSet {
    #[validate(length(min = 1))]
    pub low: Vec<String>,
    #[validate(length(min = 1))]
    pub moderate: Vec<String>,
    #[validate(length(min = 1))]
    pub high: Vec<String>,
}

impl Default for RecommendationSet {
    fn default() -> Self {
        Self {
            low: to_strings(&[
                "Self-care practices जारी रखें",
                "Wellness activities में भाग लें",
                "नियमित रूप से mood को monitor करें",
                "यदि feelings worse हों तो तुरंत help लें",
                "Healthy lifestyle maintain करें",
            ]),
            moderate: to_strings(&[
                "नियमित counseling sessions की सलाह दी जाती है",
                "Stress management workshops में join करें",
                "रोजाना meditation का अभ्यास करें",
                "Social connections बनाए रखें",
                "Academic support लें यदि जरूरत हो",
            ]),
            high: to_strings(&[
                "तुरंत counselor से मिलना जरूरी है - Immediate counselor consultation recommended",
                "{counselor_name} से संपर्क करें: {counselor_phone}",
                "24/7 Crisis Helpline: {helpline}",
                "Daily self-care activities शुरू करें",
                "Family/friends को inform करें (with consent)",
            ]),
        }
    }
}

const DEFAULT_CRISIS_PHRASES: &[&str] = &[
    // English
    "suicide",
    "kill myself",
    "end my life",
    "hurt myself",
    "self harm",
    "better off dead",
    "no point living",
    "want to die",
    "ending it all",
    // Hindi
    "आत्महत्या",
    "मर जाना",
    "जीने का मन नहीं",
    "खुद को नुकसान",
    "जान देना",
    // Short triggers
    "death",
    "die",
    "harm",
    "cut myself",
    "overdose",
    "jump",
    "hanging",
];

const DEFAULT_SAFETY_MESSAGE: &str = "🚨 मुझे आपकी बहुत चिंता हो रही है। आपकी जिंदगी बहुत कीमती है।

Please reach out immediately:
📞 Campus Counselor {counselor_name}: {counselor_phone}
📞 24/7 Crisis Helpline: {helpline}
📞 Emergency: {emergency}

आप अकेले नहीं हैं। Help is available.";

/// Everything the risk engine needs, validated once at construction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Trigger phrases in either language.
    #[validate(length(min = 1))]
    pub crisis_phrases: Vec<String>,
    pub match_mode: MatchMode,
    /// Template shown with a positive crisis verdict.
    #[validate(length(min = 1))]
    pub safety_message: String,
    #[validate(nested)]
    pub contacts: CrisisContacts,
    /// Who incidents are assigned to.
    #[validate(length(min = 1))]
    pub default_responder: String,
    pub depression_categories: CategoryTable,
    pub anxiety_categories: CategoryTable,
    pub risk_rules: RiskRules,
    #[validate(nested)]
    pub recommendations: RecommendationSet,
    /// Days before a student may take the screening again.
    #[validate(range(min = 1, max = 365))]
    pub retake_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let contacts = CrisisContacts::default();
        Self {
            crisis_phrases: to_strings(DEFAULT_CRISIS_PHRASES),
            match_mode: MatchMode::default(),
            safety_message: DEFAULT_SAFETY_MESSAGE.to_string(),
            default_responder: contacts.counselor_name.clone(),
            contacts,
            depression_categories: CategoryTable::phq9(),
            anxiety_categories: CategoryTable::gad7(),
            risk_rules: RiskRules::default(),
            recommendations: RecommendationSet::default(),
            retake_window_days: 7,
        }
    }
}

impl EngineConfig {
    /// Load a (possibly partial) configuration document. Missing fields keep
    /// their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Field and structural checks. Failing here is fatal at startup.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        if self.crisis_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(AppError::Config(
                "crisis phrase set has no usable phrase".to_string(),
            ));
        }
        if self.default_responder.trim().is_empty() {
            return Err(AppError::Config("default responder is blank".to_string()));
        }

        self.depression_categories.check_covers(Instrument::Phq9)?;
        self.anxiety_categories.check_covers(Instrument::Gad7)?;
        self.risk_rules.check()?;
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
