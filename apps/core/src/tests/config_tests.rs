//! Settings Tests
//!
//! Settings built from explicit lookups, from the process environment and
//! from JSON engine configuration files.

use crate::config::{
    Settings, ENV_COMPLETION_TIMEOUT, ENV_DEFAULT_RESPONDER, ENV_ENGINE_CONFIG,
    ENV_GEMINI_API_KEY, ENV_GEMINI_BASE_URL, ENV_GEMINI_MODEL, ENV_LOG_FORMAT, ENV_MATCH_MODE,
};
use crate::error::AppError;
use crate::logging::LogFormat;
use crate::risk::{MatchMode, RiskEngine};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, AppError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write config");
    file
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn test_defaults_without_variables() {
        let settings = settings_from(&[]).unwrap();

        assert!(settings.gemini.is_none());
        assert_eq!(settings.completion_timeout, Duration::from_secs(20));
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert_eq!(settings.engine.match_mode, MatchMode::Substring);
        assert_eq!(settings.engine.default_responder, "Dr. Priya Sharma");
        assert!(settings.completion_provider().unwrap().is_none());
        assert!(settings.engine_config_path.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let settings = settings_from(&[
            (ENV_DEFAULT_RESPONDER, "  Wellness Desk "),
            (ENV_MATCH_MODE, "Word"),
            (ENV_COMPLETION_TIMEOUT, "5"),
            (ENV_LOG_FORMAT, "json"),
        ])
        .unwrap();

        assert_eq!(settings.engine.default_responder, "Wellness Desk");
        assert_eq!(settings.engine.match_mode, MatchMode::WordBoundary);
        assert_eq!(settings.completion_timeout, Duration::from_secs(5));
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let settings = settings_from(&[(ENV_GEMINI_API_KEY, "  "), (ENV_MATCH_MODE, "")]).unwrap();
        assert!(settings.gemini.is_none());
        assert_eq!(settings.engine.match_mode, MatchMode::Substring);
    }

    #[test]
    fn test_gemini_settings() {
        let settings = settings_from(&[(ENV_GEMINI_API_KEY, "secret")]).unwrap();
        let gemini = settings.gemini.clone().unwrap();
        assert_eq!(gemini.api_key, "secret");
        assert_eq!(gemini.model, "gemini-1.5-flash");
        assert_eq!(gemini.base_url, "https://generativelanguage.googleapis.com");

        let provider = settings.completion_provider().unwrap().unwrap();
        assert_eq!(provider.name(), "gemini");

        let settings = settings_from(&[
            (ENV_GEMINI_API_KEY, "secret"),
            (ENV_GEMINI_MODEL, "gemini-pro"),
            (ENV_GEMINI_BASE_URL, "http://localhost:8089"),
        ])
        .unwrap();
        let gemini = settings.gemini.unwrap();
        assert_eq!(gemini.model, "gemini-pro");
        assert_eq!(gemini.base_url, "http://localhost:8089");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            (ENV_COMPLETION_TIMEOUT, "soon"),
            (ENV_COMPLETION_TIMEOUT, "-3"),
            (ENV_MATCH_MODE, "fuzzy"),
            (ENV_LOG_FORMAT, "xml"),
        ];
        for (key, value) in cases {
            let result = settings_from(&[(key, value)]);
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "Expected config error for {}={}",
                key,
                value
            );
        }
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_partial_engine_config() {
        let file = config_file(
            r#"{
                "crisis_phrases": ["hopeless", "निराश"],
                "retake_window_days": 14,
                "contacts": { "counselor_phone": "0000000000" }
            }"#,
        );
        let path = file.path().to_string_lossy().to_string();

        let settings = settings_from(&[(ENV_ENGINE_CONFIG, path.as_str())]).unwrap();

        assert_eq!(settings.engine_config_path.as_deref(), Some(file.path()));
        assert_eq!(settings.engine.crisis_phrases, vec!["hopeless", "निराश"]);
        assert_eq!(settings.engine.retake_window_days, 14);
        assert_eq!(settings.engine.contacts.counselor_phone, "0000000000");
        assert_eq!(settings.engine.contacts.counselor_name, "Dr. Priya Sharma");

        let engine = RiskEngine::new(&settings.engine).unwrap();
        let verdict = engine.classify_crisis_text("Feeling HOPELESS today");
        assert!(verdict.is_crisis);
        assert!(verdict.safety_message.unwrap().contains("0000000000"));
        assert!(!engine.classify_crisis_text("suicide").is_crisis);
    }

    #[test]
    fn test_invalid_engine_config_rejected() {
        let documents = [
            r#"{ "retake_window_days": 0 }"#,
            r#"{ "retake_window_days": 366 }"#,
            r#"{ "retake_window_days": 9223372036854775807 }"#,
            r#"{ "crisis_phrases": [] }"#,
            r#"{ "depression_categories": [{ "max_score": 9, "label": "Mild" }, { "max_score": 4, "label": "Minimal" }] }"#,
            r#"{ "anxiety_categories": [{ "max_score": 14, "label": "Moderate" }] }"#,
            r#"{ "contacts": { "helpline": "" } }"#,
            r#"{ "risk_rules": { "high_anxiety": 22 } }"#,
            "not json",
        ];
        for document in documents {
            let file = config_file(document);
            let path = file.path().to_string_lossy().to_string();
            let result = settings_from(&[(ENV_ENGINE_CONFIG, path.as_str())]);
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "Expected config error for {}",
                document
            );
        }
    }

    #[test]
    fn test_missing_engine_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json").to_string_lossy().to_string();
        let result = settings_from(&[(ENV_ENGINE_CONFIG, path.as_str())]);
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;

    #[test]
    fn test_from_env_reads_process_environment() {
        temp_env::with_vars(
            vec![
                (ENV_ENGINE_CONFIG, None),
                (ENV_DEFAULT_RESPONDER, Some("Night Counselor")),
                (ENV_MATCH_MODE, Some("substring")),
                (ENV_COMPLETION_TIMEOUT, Some("7")),
                (ENV_LOG_FORMAT, None),
                (ENV_GEMINI_API_KEY, None),
                (ENV_GEMINI_MODEL, None),
                (ENV_GEMINI_BASE_URL, None),
            ],
            || {
                let settings = Settings::from_env().unwrap();
                assert_eq!(settings.engine.default_responder, "Night Counselor");
                assert_eq!(settings.completion_timeout, Duration::from_secs(7));
                assert!(settings.gemini.is_none());
            },
        );
    }

    #[test]
    fn test_from_env_surfaces_bad_values() {
        temp_env::with_vars(
            vec![
                (ENV_ENGINE_CONFIG, None),
                (ENV_COMPLETION_TIMEOUT, Some("forever")),
            ],
            || {
                assert!(matches!(Settings::from_env(), Err(AppError::Config(_))));
            },
        );
    }
}
