use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::fallback::FallbackResponder;
use super::provider::{counsellor_prompt, CompletionProvider};
use crate::error::AppError;
use crate::risk::{CrisisVerdict, IncidentDescriptor, RiskEngine};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(20);

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Provider,
    Fallback,
}

/// One answered chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_message: String,
    pub response: String,
    pub crisis: CrisisVerdict,
    pub source: ResponseSource,
    pub response_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// A chat turn plus the incident it raised, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub turn: ChatTurn,
    pub incident: Option<IncidentDescriptor>,
}

/// Answers student messages.
///
/// Crisis detection runs before, and regardless of, the completion call; the
/// fallback path needs no network.
pub struct ChatService {
    engine: Arc<RiskEngine>,
    provider: Option<Arc<dyn CompletionProvider>>,
    fallback: FallbackResponder,
    completion_timeout: Duration,
}

impl ChatService {
    pub fn new(
        engine: Arc<RiskEngine>,
        provider: Option<Arc<dyn CompletionProvider>>,
        fallback: FallbackResponder,
    ) -> Self {
        Self {
            engine,
            provider,
            fallback,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, completion_timeout: Duration) -> Self {
        self.completion_timeout = completion_timeout;
        self
    }

    /// Whether replies currently come from the completion provider.
    pub fn provider_status(&self) -> &'static str {
        if self.provider.is_some() {
            "active"
        } else {
            "fallback"
        }
    }

    /// Processes one student message.
    ///
    /// `event_ref` is the caller's identifier for the message; it is copied
    /// into any incident raised.
    #[instrument(skip(self, message))]
    pub async fn respond(&self, event_ref: &str, message: &str) -> Result<ChatOutcome, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::EmptyMessage);
        }

        let started = Instant::now();
        let crisis = self.engine.classify_crisis_text(message);
        if crisis.is_crisis {
            warn!(
                phrase = crisis.matched_phrase.as_deref().unwrap_or_default(),
                "Crisis language detected"
            );
        }

        let (response, source) = match self.complete(message).await {
            Ok(text) => (text, ResponseSource::Provider),
            Err(e) => {
                if self.provider.is_some() {
                    warn!(error = %e, "Completion failed, using fallback reply");
                } else {
                    debug!("No completion provider, using fallback reply");
                }
                (self.fallback.respond(message, &crisis), ResponseSource::Fallback)
            }
        };

        let incident = self
            .engine
            .evaluate_crisis_escalation(event_ref, message, &crisis);

        let turn = ChatTurn {
            user_message: message.to_string(),
            response,
            crisis,
            source,
            response_time_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        };

        info!(
            source = ?turn.source,
            crisis = turn.crisis.is_crisis,
            elapsed_ms = turn.response_time_ms,
            "Chat turn completed"
        );

        Ok(ChatOutcome { turn, incident })
    }

    async fn complete(&self, message: &str) -> Result<String, AppError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AppError::Provider("no completion provider configured".to_string()))?;

        let text = timeout(self.completion_timeout, provider.complete(counsellor_prompt(message)))
            .await??;

        if text.trim().is_empty() {
            return Err(AppError::Provider(format!(
                "{} returned an empty reply",
                provider.name()
            )));
        }
        Ok(text)
    }
}
