use super::*;
use crate::llm::types::{Content, GenerationSettings, WireRole};
use std::collections::HashMap;
use std::sync::Mutex;

// =========================================================================
// MockProvider
// =========================================================================

#[derive(Clone, Copy)]
enum Scripted {
    Reply,
    RateLimited,
    ServerError,
    Empty,
    Hang,
}

/// Answers according to a per-key script and records every key it saw.
struct MockProvider {
    script: HashMap<String, Scripted>,
    seen: Mutex<Vec<(String, GenerateRequest)>>,
}

impl MockProvider {
    fn new(script: &[(&str, Scripted)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(k, s)| ((*k).to_string(), *s))
                .collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn keys_seen(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl GenerateContent for MockProvider {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, LlmError> {
        self.seen
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        match self.script.get(api_key).copied().unwrap_or(Scripted::Reply) {
            Scripted::Reply => Ok(format!("reply from {api_key}")),
            Scripted::RateLimited => Err(LlmError::RateLimited { status: 429 }),
            Scripted::ServerError => Err(LlmError::ApiResponse { status: 500, message: "boom".into() }),
            Scripted::Empty => Err(LlmError::EmptyResponse),
            Scripted::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".into())
            }
        }
    }
}

fn request() -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(WireRole::User, "hi")],
        generation_config: GenerationSettings { max_output_tokens: 10, temperature: 0.0 },
    }
}

fn ring(keys: &[&str]) -> CredentialRing {
    CredentialRing::new(keys.iter().copied()).unwrap()
}

// =========================================================================
// Rotation
// =========================================================================

#[tokio::test]
async fn first_key_success_uses_one_attempt() {
    let mock = MockProvider::new(&[]);
    let text = generate_with_rotation(&mock, &ring(&["A", "B"]), &request())
        .await
        .unwrap();
    assert_eq!(text, "reply from A");
    assert_eq!(mock.keys_seen(), vec!["A"]);
}

#[tokio::test]
async fn rate_limited_first_key_rotates_and_never_retries_it() {
    let mock = MockProvider::new(&[("A", Scripted::RateLimited)]);
    let text = generate_with_rotation(&mock, &ring(&["A", "B"]), &request())
        .await
        .unwrap();
    assert_eq!(text, "reply from B");
    assert_eq!(mock.keys_seen(), vec!["A", "B"]);
}

#[tokio::test]
async fn every_key_rate_limited_is_exhausted() {
    for n in 1..=4 {
        let keys: Vec<String> = (0..n).map(|i| format!("K{i}")).collect();
        let script: Vec<(&str, Scripted)> = keys
            .iter()
            .map(|k| (k.as_str(), Scripted::RateLimited))
            .collect();
        let mock = MockProvider::new(&script);
        let ring = CredentialRing::new(keys.clone()).unwrap();
        let err = generate_with_rotation(&mock, &ring, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimitExhausted { attempts } if attempts == n), "n = {n}");
        assert_eq!(mock.keys_seen(), keys);
    }
}

#[tokio::test]
async fn fewer_rate_limits_than_keys_succeeds_on_first_free_key() {
    for n in 2..=4 {
        for limited in 0..n {
            let keys: Vec<String> = (0..n).map(|i| format!("K{i}")).collect();
            let script: Vec<(&str, Scripted)> = keys
                .iter()
                .take(limited)
                .map(|k| (k.as_str(), Scripted::RateLimited))
                .collect();
            let mock = MockProvider::new(&script);
            let ring = CredentialRing::new(keys.clone()).unwrap();
            let text = generate_with_rotation(&mock, &ring, &request())
                .await
                .unwrap();
            assert_eq!(text, format!("reply from K{limited}"));
            assert_eq!(mock.keys_seen().len(), limited + 1);
        }
    }
}

#[tokio::test]
async fn non_rate_limit_error_does_not_rotate() {
    let mock = MockProvider::new(&[("A", Scripted::ServerError)]);
    let err = generate_with_rotation(&mock, &ring(&["A", "B"]), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ApiResponse { status: 500, .. }));
    assert_eq!(mock.keys_seen(), vec!["A"]);
}

#[tokio::test]
async fn empty_response_after_rotation_is_reported() {
    let mock = MockProvider::new(&[("A", Scripted::RateLimited), ("B", Scripted::Empty)]);
    let err = generate_with_rotation(&mock, &ring(&["A", "B"]), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn same_body_sent_on_every_attempt() {
    let mock = MockProvider::new(&[("A", Scripted::RateLimited)]);
    let req = request();
    generate_with_rotation(&mock, &ring(&["A", "B"]), &req)
        .await
        .unwrap();
    let seen = mock.seen.lock().unwrap();
    assert!(seen.iter().all(|(_, r)| *r == req));
}

// =========================================================================
// Deadline
// =========================================================================

#[tokio::test(start_paused = true)]
async fn deadline_turns_hang_into_timeout() {
    let mock = MockProvider::new(&[("A", Scripted::Hang)]);
    let err = generate_within(Duration::from_secs(60), &mock, &ring(&["A", "B"]), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Timeout));
    assert_eq!(mock.keys_seen(), vec!["A"]);
}

#[tokio::test]
async fn deadline_passes_through_success() {
    let mock = MockProvider::new(&[]);
    let text = generate_within(Duration::from_secs(5), &mock, &ring(&["A"]), &request())
        .await
        .unwrap();
    assert_eq!(text, "reply from A");
}
