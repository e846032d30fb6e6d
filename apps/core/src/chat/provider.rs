use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Defines the public interface for an external text completion service.
///
/// The service is opaque text-in/text-out with its own failure mode; callers
/// must keep working when it is slow, failing, or absent.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Generates a complete reply for a prompt.
    async fn complete(&self, prompt: String) -> Result<String, AppError>;
}

/// Wrap a student's message in the counsellor persona instructions.
pub fn counsellor_prompt(user_message: &str) -> String {
    format!(
        "You are \"Sahayak\" (सहायक), a compassionate mental health counselor for Indian college students.
Respond with empathy and cultural sensitivity. Use both English and Hindi naturally.

User message: {}

Guidelines:
- Be warm, supportive, and non-judgmental
- Include Hindi phrases like \"आप अकेले नहीं हैं\" (You are not alone)
- Suggest practical coping strategies for Indian students
- For crisis messages, provide immediate help resources
- Keep responses under 200 words
- Address common issues like exam stress, family pressure, homesickness",
        user_message
    )
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini `generateContent` over HTTPS.
pub struct GeminiProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(base_url: &str, model: &str, api_key: String) -> Result<Self, AppError> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("Gemini API key is empty".to_string()));
        }
        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        ))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: String) -> Result<String, AppError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response: GenerateResponse = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::Provider("completion returned no text".to_string()));
        }
        Ok(text)
    }
}
