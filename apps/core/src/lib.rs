// Sahayak Core
// Risk assessment and crisis detection for the student support platform.

pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod risk;

#[cfg(test)]
mod tests;

pub use error::{AppError, Instrument, ValidationError, Violation};
pub use risk::{
    CrisisVerdict, EngineConfig, IncidentDescriptor, IncidentSource, RiskEngine, RiskTier,
    ScreeningSubmission, ScreeningVerdict,
};
