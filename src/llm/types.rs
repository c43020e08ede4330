//! LLM types: errors, the wire request, and the per-attempt trait.
//!
//! The request shape is the provider's `generateContent` body. It is built
//! once per exchange and reused verbatim for every credential attempt.

use serde::Serialize;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM configuration and requests.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// None of the credential variables held a value.
    #[error("no API credentials configured (checked {vars})")]
    NoCredentials { vars: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Transport-level failure: connect, TLS, body read.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// An attempt or the whole rotation ran past its deadline.
    #[error("API request timed out")]
    Timeout,

    /// One credential was rejected for rate limiting. Drives rotation; never
    /// escapes [`super::retry::generate_with_rotation`].
    #[error("rate limited: status {status}")]
    RateLimited { status: u16 },

    /// Every credential in the ring was rate limited.
    #[error("rate limit exhausted after {attempts} credential(s)")]
    RateLimitExhausted { attempts: usize },

    /// The provider returned a non-success status other than rate limiting.
    #[error("API response error: status {status}: {message}")]
    ApiResponse { status: u16, message: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// Success status, but no candidate text.
    #[error("API response contained no reply")]
    EmptyResponse,
}

impl LlmError {
    /// Whether the visitor should be told to wait rather than call.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::RateLimitExhausted { .. })
    }
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::NoCredentials { .. } => "E_NO_CREDENTIALS",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::Timeout => "E_API_TIMEOUT",
            Self::RateLimited { .. } => "E_RATE_LIMITED",
            Self::RateLimitExhausted { .. } => "E_RATE_LIMIT_EXHAUSTED",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_)
                | Self::Timeout
                | Self::RateLimited { .. }
                | Self::RateLimitExhausted { .. }
                | Self::ApiResponse { status: 500..=599, .. }
        )
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Role label on the wire. Assistant turns are sent as `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<widgets::chat::Role> for WireRole {
    fn from(role: widgets::chat::Role) -> Self {
        match role {
            widgets::chat::Role::User => Self::User,
            widgets::chat::Role::Assistant => Self::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: WireRole,
    pub parts: Vec<Part>,
}

impl Content {
    #[must_use]
    pub fn text(role: WireRole, text: impl Into<String>) -> Self {
        Self { role, parts: vec![Part { text: text.into() }] }
    }
}

/// Sampling knobs sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationSettings,
}

// =============================================================================
// GENERATE TRAIT
// =============================================================================

/// One attempt against the provider with one credential. Enables mocking in
/// tests.
#[async_trait::async_trait]
pub trait GenerateContent: Send + Sync {
    /// Send `request` authenticated with `api_key` and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::RateLimited`] when this credential is throttled,
    /// and the other [`LlmError`] variants for every other failure.
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
