//! Test Module
//!
//! Cross-module test suite for the Sahayak core.
//!
//! ## Test Categories
//! - `risk_tests`: crisis classification, screening scoring, escalation
//! - `chat_tests`: chat turns with mock and HTTP completion providers
//! - `config_tests`: settings from lookups, environment and JSON files
//! - `integration_tests`: full chat and screening workflows

pub mod config_tests;
