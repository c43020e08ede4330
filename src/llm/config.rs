//! LLM configuration parsed from environment variables.

use super::ring::CredentialRing;
use super::types::{GenerationSettings, LlmError};
use crate::config::env_parse;

/// Variables holding credentials, in rotation order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GEMINI_API_KEY_2"];

pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LLM_TOTAL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    /// Per attempt.
    pub request_secs: u64,
    pub connect_secs: u64,
    /// Whole rotation, all attempts included.
    pub total_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub ring: CredentialRing,
    pub model: String,
    pub base_url: String,
    pub settings: GenerationSettings,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Required (at least one):
    /// - `GEMINI_API_KEY`, `GEMINI_API_KEY_2`; blank values are skipped
    ///
    /// Optional:
    /// - `LLM_MODEL`: default `gemini-2.5-flash-lite`
    /// - `LLM_BASE_URL`: default provider v1beta endpoint
    /// - `LLM_MAX_OUTPUT_TOKENS`: default 500
    /// - `LLM_TEMPERATURE`: default 0.7, must be within 0.0..=2.0
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LLM_TOTAL_TIMEOUT_SECS`: default 60
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::NoCredentials`] when no key is set, and
    /// [`LlmError::ConfigParse`] for an out-of-range temperature.
    pub fn from_env() -> Result<Self, LlmError> {
        let keys: Vec<String> = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .collect();
        let ring = CredentialRing::new(keys).map_err(|_| LlmError::NoCredentials { vars: API_KEY_VARS.join(", ") })?;

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let temperature = env_parse("LLM_TEMPERATURE", DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(LlmError::ConfigParse(format!("LLM_TEMPERATURE out of range: {temperature}")));
        }
        let settings = GenerationSettings {
            max_output_tokens: env_parse("LLM_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS),
            temperature,
        };
        let timeouts = LlmTimeouts {
            request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
            total_secs: env_parse("LLM_TOTAL_TIMEOUT_SECS", DEFAULT_LLM_TOTAL_TIMEOUT_SECS),
        };

        Ok(Self { ring, model, base_url, settings, timeouts })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
