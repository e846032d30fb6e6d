//! # Risk Module
//!
//! Deterministic risk assessment for the Sahayak platform.
//! Pure functions over their arguments: no storage, no network, no logging.
//!
//! ## Components
//! - `crisis`: bilingual crisis phrase detection in chat messages
//! - `screening`: PHQ-9 / GAD-7 validation, scoring and risk tiers
//! - `escalation`: incident descriptors for positive verdicts
//! - `verdict`: output data structures
//! - `config`: injected phrases, tables, thresholds and messages
//! - `engine`: facade owning all of the above

pub mod config;
pub mod crisis;
pub mod engine;
pub mod escalation;
pub mod screening;
pub mod verdict;

pub use config::{CategoryTable, CrisisContacts, EngineConfig, MatchMode, RecommendationSet, RiskRules, SeverityBand};
pub use crisis::CrisisClassifier;
pub use engine::RiskEngine;
pub use escalation::EscalationCoordinator;
pub use screening::{Answer, ScreeningScorer, ScreeningSubmission};
pub use verdict::{CrisisVerdict, IncidentDescriptor, IncidentSource, RiskTier, ScreeningVerdict};
