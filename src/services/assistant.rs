//! Assistant service: one visitor message in, one reply turn out.
//!
//! DESIGN
//! ======
//! `exchange` validates the message, builds the provider request from the
//! most recent turns of the transcript, and runs the rotation engine under
//! the overall deadline. Sessions have no length limit; only the tail of the
//! history is sent upstream. Whatever happens upstream, the
//! returned transcript is the old one plus exactly two turns: the visitor's
//! message and either the reply or a fallback. Provider errors are logged
//! here and never reach the visitor verbatim.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use widgets::chat::{Role, Transcript};

use crate::error::ErrorCode;
use crate::llm::{CredentialRing, GenerateContent, GenerationSettings, LlmConfig, LlmError, build_request, generate_within};
use crate::services::clinic;

pub const MAX_MESSAGE_CHARS: usize = 2_000;

pub const BUSY_MESSAGE: &str =
    "I'm currently handling high volume. Please wait a moment before your next query.";

/// Shown for every failure that is not rate limiting.
#[must_use]
pub fn unavailable_message() -> String {
    format!(
        "I'm having a temporary issue reaching my knowledge base. Please call us at {} \
         or use the Book Appointment button.",
        clinic::PHONE_DISPLAY
    )
}

// =============================================================================
// ERRORS & OUTCOMES
// =============================================================================

/// Rejections of the request itself. Provider failures are not errors here;
/// they become a [`ReplyOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },
}

impl ErrorCode for AssistantError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "E_EMPTY_MESSAGE",
            Self::MessageTooLong { .. } => "E_MESSAGE_TOO_LONG",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOutcome {
    Answered,
    /// Rate limited: upstream on every credential, or inbound.
    Busy,
    Unavailable,
}

impl ReplyOutcome {
    #[must_use]
    pub fn from_error(err: &LlmError) -> Self {
        if err.is_busy() { Self::Busy } else { Self::Unavailable }
    }

    /// Visitor-facing text for a failed outcome.
    #[must_use]
    pub fn fallback_message(self) -> Option<String> {
        match self {
            Self::Answered => None,
            Self::Busy => Some(BUSY_MESSAGE.to_string()),
            Self::Unavailable => Some(unavailable_message()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exchange {
    pub transcript: Transcript,
    pub outcome: ReplyOutcome,
}

impl Exchange {
    /// Text of the assistant turn this exchange appended.
    #[must_use]
    pub fn reply(&self) -> &str {
        self.transcript.last().map_or("", |turn| turn.text.as_str())
    }
}

// =============================================================================
// ASSISTANT
// =============================================================================

pub struct Assistant {
    llm: Arc<dyn GenerateContent>,
    ring: CredentialRing,
    settings: GenerationSettings,
    system_prompt: String,
    deadline: Duration,
}

impl Assistant {
    #[must_use]
    pub fn new(
        llm: Arc<dyn GenerateContent>,
        ring: CredentialRing,
        settings: GenerationSettings,
        deadline: Duration,
    ) -> Self {
        Self { llm, ring, settings, system_prompt: clinic::system_prompt(), deadline }
    }

    #[must_use]
    pub fn from_config(llm: Arc<dyn GenerateContent>, config: LlmConfig) -> Self {
        Self::new(llm, config.ring, config.settings, Duration::from_secs(config.timeouts.total_secs))
    }

    /// Answer `message` given the prior `transcript`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request is malformed. Provider
    /// failures produce an [`Exchange`] carrying a fallback reply.
    pub async fn exchange(&self, transcript: Transcript, message: &str) -> Result<Exchange, AssistantError> {
        let message = validate(message)?;
        let request = build_request(&self.system_prompt, &transcript, message, self.settings);

        let result = generate_within(self.deadline, self.llm.as_ref(), &self.ring, &request).await;

        let (reply, outcome) = match result {
            Ok(text) => {
                info!(turns = transcript.len(), "assistant: answered");
                (text, ReplyOutcome::Answered)
            }
            Err(e) => {
                let outcome = ReplyOutcome::from_error(&e);
                warn!(error = %e, ?outcome, "assistant: provider request failed");
                (outcome.fallback_message().unwrap_or_default(), outcome)
            }
        };

        Ok(append(transcript, message, reply, outcome))
    }

    /// Record `message` with a fallback reply without calling the provider.
    /// Used when the inbound limiter refuses the request.
    ///
    /// # Errors
    ///
    /// Same validation as [`Assistant::exchange`].
    pub fn decline(
        &self,
        transcript: Transcript,
        message: &str,
        outcome: ReplyOutcome,
    ) -> Result<Exchange, AssistantError> {
        let message = validate(message)?;
        let reply = outcome.fallback_message().unwrap_or_default();
        Ok(append(transcript, message, reply, outcome))
    }
}

/// Trimmed `message`, or why it cannot be sent.
///
/// # Errors
///
/// Returns an error for a blank or oversized message.
pub fn validate(message: &str) -> Result<&str, AssistantError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AssistantError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AssistantError::MessageTooLong { max: MAX_MESSAGE_CHARS });
    }
    Ok(message)
}

fn append(mut transcript: Transcript, message: &str, reply: String, outcome: ReplyOutcome) -> Exchange {
    transcript.push(Role::User, message);
    transcript.push(Role::Assistant, reply);
    Exchange { transcript, outcome }
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
