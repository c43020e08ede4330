//! Assistant chat proxy.
//!
//! The browser never holds provider credentials; it posts its transcript and
//! the new message here and receives the updated transcript back.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::warn;
use widgets::chat::Transcript;

use crate::error::{ErrorBody, error_response};
use crate::services::assistant::{self, AssistantError, Exchange, ReplyOutcome};
use crate::services::clinic;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Prior turns. Omitted on the first message of a session, in which case
    /// the conversation starts from the clinic greeting.
    #[serde(default)]
    pub transcript: Option<Transcript>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub transcript: Transcript,
    pub reply: String,
    pub outcome: ReplyOutcome,
}

impl From<Exchange> for ChatResponse {
    fn from(exchange: Exchange) -> Self {
        let reply = exchange.reply().to_string();
        Self { transcript: exchange.transcript, reply, outcome: exchange.outcome }
    }
}

/// `POST /api/assistant/chat`: append the visitor's message and the reply.
///
/// Provider failures still answer `200` with a fallback reply; only a
/// malformed request is an error.
pub async fn chat(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Response> {
    // A malformed message must not spend one of the visitor's slots.
    assistant::validate(&body.message).map_err(|e| assistant_error_response(&e))?;

    let transcript = body
        .transcript
        .unwrap_or_else(|| Transcript::with_greeting(clinic::GREETING));

    let exchange = match state.rate_limiter.check_and_record(peer.ip()) {
        Ok(()) => state.assistant.exchange(transcript, &body.message).await,
        Err(e) => {
            warn!(client = %peer.ip(), error = %e, "assistant: request refused by limiter");
            state
                .assistant
                .decline(transcript, &body.message, ReplyOutcome::Busy)
        }
    };

    exchange
        .map(|ex| Json(ex.into()))
        .map_err(|e| assistant_error_response(&e))
}

fn assistant_error_response(err: &AssistantError) -> Response {
    error_response(StatusCode::BAD_REQUEST, ErrorBody::from_error(err))
}
