//! Remote proximity scoring through a chat-completion endpoint.
//!
//! The model is asked how close a candidate word is to the target on a
//! 1-100 scale and must answer with the number only.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScoringConfig;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scoring endpoint returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("model replied with a non-numeric answer: {0:?}")]
    NotANumber(String),
}

/// Collaborator that rates how close `candidate` is to `target`.
#[async_trait]
pub trait ProximityScorer: Send + Sync {
    async fn score(&self, candidate: &str, target: &str) -> Result<i64, ScoringError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub fn build_prompt(candidate: &str, target: &str) -> String {
    format!(
        "You are a linguistics expert. Give me the proximity from 1 to 100 (100 being exactly \
         the right word) between \"{candidate}\" and \"{target}\". ANSWER ONLY WITH THE \
         PROXIMITY VALUE AND NOTHING ELSE."
    )
}

/// Parse the model's reply the lenient way: optional sign, then leading digits.
///
/// Anything after the digits is ignored, so `"87%"` reads as 87.
pub fn parse_proximity(reply: &str) -> Option<i64> {
    let reply = reply.trim();
    let (negative, rest) = match reply.as_bytes().first() {
        Some(b'-') => (true, &reply[1..]),
        Some(b'+') => (false, &reply[1..]),
        _ => (false, reply),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    // Saturate absurdly long numbers instead of failing; the caller clamps.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct ChatCompletionScorer {
    config: ScoringConfig,
    http_client: reqwest::Client,
}

impl ChatCompletionScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, candidate: &str, target: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(candidate, target),
            }],
        }
    }
}

#[async_trait]
impl ProximityScorer for ChatCompletionScorer {
    async fn score(&self, candidate: &str, target: &str) -> Result<i64, ScoringError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ScoringError::MissingApiKey)?;

        log::debug!(
            "Requesting proximity for '{}' from {} ({})",
            candidate,
            self.config.endpoint,
            self.config.model
        );

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(candidate, target))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ScoringError::Malformed(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ScoringError::Malformed("response has no choices".to_string()))?;

        log::debug!("Model replied {:?} for '{}'", content, candidate);
        parse_proximity(&content).ok_or(ScoringError::NotANumber(content))
    }
}
