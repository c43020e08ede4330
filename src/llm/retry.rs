//! Credential rotation around a single logical request.
//!
//! DESIGN
//! ======
//! Attempts run strictly one after another, never in parallel, so the
//! provider never sees the same conversation twice at once. Only a
//! rate-limit answer moves on to the next key; any other failure ends the
//! request immediately with that error. The request body is built once by
//! the caller and sent unchanged on every attempt.

use std::time::Duration;

use tracing::{info, warn};

use super::ring::CredentialRing;
use super::types::{GenerateContent, GenerateRequest, LlmError};

/// Try each key in `ring` in order until one is not rate limited.
///
/// # Errors
///
/// Returns [`LlmError::RateLimitExhausted`] when every key was rate limited,
/// or the first non-rate-limit error encountered.
pub async fn generate_with_rotation(
    client: &dyn GenerateContent,
    ring: &CredentialRing,
    request: &GenerateRequest,
) -> Result<String, LlmError> {
    let mut cursor = ring.cursor();
    while let Some((index, key)) = cursor.next_key() {
        match client.generate(key, request).await {
            Err(LlmError::RateLimited { status }) => {
                warn!(credential = index + 1, of = ring.len(), status, "llm: credential rate limited");
                if cursor.remaining() > 0 {
                    info!(next = index + 2, "llm: rotating to next credential");
                }
            }
            other => return other,
        }
    }
    Err(LlmError::RateLimitExhausted { attempts: cursor.attempts() })
}

/// [`generate_with_rotation`] bounded by an overall deadline.
///
/// # Errors
///
/// Returns [`LlmError::Timeout`] if the deadline passes first, otherwise
/// whatever the rotation returns.
pub async fn generate_within(
    deadline: Duration,
    client: &dyn GenerateContent,
    ring: &CredentialRing,
    request: &GenerateRequest,
) -> Result<String, LlmError> {
    tokio::time::timeout(deadline, generate_with_rotation(client, ring, request))
        .await
        .unwrap_or(Err(LlmError::Timeout))
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
