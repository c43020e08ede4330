//! LLM: assistant request engine with credential rotation.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables. [`GeminiClient`] makes
//! exactly one attempt per call; [`retry`] drives the attempts across the
//! [`CredentialRing`]. The [`GenerateContent`] trait sits between the two so
//! services can run against a scripted provider in tests.

pub mod config;
pub mod gemini;
pub mod retry;
pub mod ring;
pub mod types;

pub use config::LlmConfig;
pub use gemini::{GeminiClient, build_request};
pub use retry::generate_within;
pub use ring::CredentialRing;
pub use types::{GenerateContent, GenerationSettings, LlmError};

impl GeminiClient {
    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(&config.base_url, &config.model, config.timeouts)
    }
}
