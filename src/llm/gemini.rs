//! Generative-language `generateContent` client.
//!
//! Thin HTTP wrapper: one call is one attempt with one key. The key travels
//! as the `key` query parameter, so transport errors are stripped of their
//! URL before they are logged or returned. Request building and response
//! parsing are pure functions for testability.

use std::time::Duration;

use serde::Deserialize;
use widgets::chat::{Role, Transcript};

use super::config::LlmTimeouts;
use super::types::{Content, GenerateContent, GenerateRequest, GenerationSettings, LlmError, WireRole};

const RATE_LIMIT_STATUS: u16 = 429;
const MAX_PROVIDER_MESSAGE_CHARS: usize = 300;

/// Prior turns sent with each request. Older turns stay in the visitor's
/// transcript but are not sent upstream.
pub const MAX_HISTORY_TURNS: usize = 40;

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, model: &str, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), model: model.to_string() })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait::async_trait]
impl GenerateContent for GeminiClient {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, LlmError> {
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        // Decided on status alone so an unreadable body still rotates.
        let status = response.status().as_u16();
        if status == RATE_LIMIT_STATUS {
            return Err(LlmError::RateLimited { status });
        }

        let text = response.text().await.map_err(transport_error)?;
        if !(200..300).contains(&status) {
            return Err(LlmError::ApiResponse { status, message: provider_message(&text) });
        }

        parse_response(&text)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::ApiRequest(e.without_url().to_string())
    }
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

/// Assemble the body: system instruction, the last [`MAX_HISTORY_TURNS`]
/// prior turns, then the new message.
///
/// The system instruction is sent as a leading user turn.
#[must_use]
pub fn build_request(
    system: &str,
    history: &Transcript,
    message: &str,
    settings: GenerationSettings,
) -> GenerateRequest {
    let recent = &history.turns()[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
    let mut contents = Vec::with_capacity(recent.len() + 2);
    contents.push(Content::text(WireRole::User, system));
    contents.extend(
        recent
            .iter()
            .map(|turn| Content::text(turn.role.into(), turn.text.clone())),
    );
    contents.push(Content::text(Role::User.into(), message));
    GenerateRequest { contents, generation_config: settings }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct ApiResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Text of the first part of the first candidate.
fn parse_response(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    api.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

/// The provider's `error.message`, else the raw body, capped for logging.
fn provider_message(body: &str) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.trim().to_string());
    message.chars().take(MAX_PROVIDER_MESSAGE_CHARS).collect()
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
