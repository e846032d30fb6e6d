//! # Chat Module
//!
//! Caller-side chat handling around the risk engine.
//!
//! ## Components
//! - `provider`: external completion service trait and the Gemini client
//! - `fallback`: canned bilingual replies when no completion is available
//! - `service`: one chat turn: crisis check, completion, fallback, escalation

pub mod fallback;
pub mod provider;
pub mod service;

pub use fallback::{FallbackResponder, FallbackTopic};
pub use provider::{counsellor_prompt, CompletionProvider, GeminiProvider};
pub use service::{ChatOutcome, ChatService, ChatTurn, ResponseSource};
