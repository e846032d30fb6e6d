//! Application settings.
//!
//! Reads `.env` (if present) and the process environment, then builds the
//! engine configuration and chat settings. The risk engine itself never
//! touches the environment.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::chat::provider::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::chat::service::DEFAULT_COMPLETION_TIMEOUT;
use crate::chat::{CompletionProvider, GeminiProvider};
use crate::error::AppError;
use crate::logging::LogFormat;
use crate::risk::{EngineConfig, MatchMode};

pub const ENV_ENGINE_CONFIG: &str = "SAHAYAK_ENGINE_CONFIG";
pub const ENV_DEFAULT_RESPONDER: &str = "SAHAYAK_DEFAULT_RESPONDER";
pub const ENV_MATCH_MODE: &str = "SAHAYAK_MATCH_MODE";
pub const ENV_COMPLETION_TIMEOUT: &str = "SAHAYAK_COMPLETION_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "SAHAYAK_LOG_FORMAT";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    /// JSON file the engine configuration was read from, if any.
    pub engine_config_path: Option<PathBuf>,
    /// `None` when no API key is configured; chat then runs on fallback replies.
    pub gemini: Option<GeminiSettings>,
    pub completion_timeout: Duration,
    pub log_format: LogFormat,
}

impl Settings {
    /// Load `.env`, then read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let engine_config_path = get(ENV_ENGINE_CONFIG).map(PathBuf::from);
        let mut engine = match &engine_config_path {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(responder) = get(ENV_DEFAULT_RESPONDER) {
            engine.default_responder = responder.trim().to_string();
        }
        if let Some(mode) = get(ENV_MATCH_MODE) {
            engine.match_mode = parse_match_mode(&mode)?;
        }

        let completion_timeout = match get(ENV_COMPLETION_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("{} must be whole seconds, got {:?}", ENV_COMPLETION_TIMEOUT, raw))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_COMPLETION_TIMEOUT,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        let gemini = get(ENV_GEMINI_API_KEY).map(|api_key| GeminiSettings {
            api_key,
            model: get(ENV_GEMINI_MODEL).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get(ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        });

        engine.check()?;

        Ok(Self {
            engine,
            engine_config_path,
            gemini,
            completion_timeout,
            log_format,
        })
    }

    /// The configured completion provider, if any.
    pub fn completion_provider(&self) -> Result<Option<Arc<dyn CompletionProvider>>, AppError> {
        match &self.gemini {
            Some(g) => {
                let provider = GeminiProvider::new(&g.base_url, &g.model, g.api_key.clone())?;
                Ok(Some(Arc::new(provider)))
            }
            None => Ok(None),
        }
    }
}

fn parse_match_mode(raw: &str) -> Result<MatchMode, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "substring" => Ok(MatchMode::Substring),
        "word" | "word_boundary" => Ok(MatchMode::WordBoundary),
        other => Err(AppError::Config(format!(
            "{} must be 'substring' or 'word', got {:?}",
            ENV_MATCH_MODE, other
        ))),
    }
}
