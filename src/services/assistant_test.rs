use super::*;
use crate::llm::gemini::MAX_HISTORY_TURNS;
use crate::llm::types::GenerateRequest;
use std::sync::Mutex;

// =========================================================================
// MockLlm
// =========================================================================

#[derive(Clone, Copy)]
enum Fail {
    RateLimited,
    Server,
    Empty,
}

impl Fail {
    fn to_error(self) -> LlmError {
        match self {
            Self::RateLimited => rate_limited(),
            Self::Server => server_error(),
            Self::Empty => LlmError::EmptyResponse,
        }
    }
}

/// Answers per key: listed keys fail with the given error, all others reply.
struct MockLlm {
    failures: Vec<(&'static str, Fail)>,
    requests: Mutex<Vec<(String, GenerateRequest)>>,
}

impl MockLlm {
    fn new(failures: Vec<(&'static str, Fail)>) -> Arc<Self> {
        Arc::new(Self { failures, requests: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl GenerateContent for MockLlm {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        match self.failures.iter().find(|(k, _)| *k == api_key) {
            Some((_, fail)) => Err(fail.to_error()),
            None => Ok(format!("answer via {api_key}")),
        }
    }
}

fn rate_limited() -> LlmError {
    LlmError::RateLimited { status: 429 }
}

fn server_error() -> LlmError {
    LlmError::ApiResponse { status: 503, message: "overloaded".into() }
}

fn assistant(llm: Arc<MockLlm>, keys: &[&str]) -> Assistant {
    Assistant::new(
        llm,
        CredentialRing::new(keys.iter().copied()).unwrap(),
        GenerationSettings { max_output_tokens: 500, temperature: 0.7 },
        Duration::from_secs(5),
    )
}

fn greeting() -> Transcript {
    Transcript::with_greeting(clinic::GREETING)
}

// =========================================================================
// exchange
// =========================================================================

#[tokio::test]
async fn answered_exchange_appends_user_then_assistant() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm.clone(), &["A", "B"]);
    let before = greeting();

    let ex = a.exchange(before.clone(), "  Do you treat sciatica?  ").await.unwrap();

    assert_eq!(ex.outcome, ReplyOutcome::Answered);
    assert_eq!(ex.transcript.len(), before.len() + 2);
    let turns = ex.transcript.turns();
    assert_eq!(&turns[..before.len()], before.turns());
    assert_eq!(turns[1].role, Role::User);
    assert_eq!(turns[1].text, "Do you treat sciatica?");
    assert_eq!(turns[2].role, Role::Assistant);
    assert_eq!(ex.reply(), "answer via A");
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn rate_limited_first_key_answers_from_second() {
    let llm = MockLlm::new(vec![("A", Fail::RateLimited)]);
    let a = assistant(llm.clone(), &["A", "B"]);

    let ex = a.exchange(greeting(), "Which days are you open?").await.unwrap();

    assert_eq!(ex.outcome, ReplyOutcome::Answered);
    assert_eq!(ex.reply(), "answer via B");
    let keys: Vec<String> = llm
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(keys, vec!["A", "B"]);
}

#[tokio::test]
async fn all_keys_rate_limited_is_busy() {
    let llm = MockLlm::new(vec![("A", Fail::RateLimited), ("B", Fail::RateLimited)]);
    let a = assistant(llm.clone(), &["A", "B"]);

    let ex = a.exchange(greeting(), "hello").await.unwrap();

    assert_eq!(ex.outcome, ReplyOutcome::Busy);
    assert_eq!(ex.reply(), BUSY_MESSAGE);
    assert_eq!(ex.transcript.len(), 3);
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn other_failures_are_unavailable_and_never_leak() {
    for fail in [Fail::Server, Fail::Empty] {
        let llm = MockLlm::new(vec![("A", fail)]);
        let a = assistant(llm.clone(), &["A", "B"]);

        let ex = a.exchange(greeting(), "hello").await.unwrap();

        assert_eq!(ex.outcome, ReplyOutcome::Unavailable);
        assert_eq!(ex.reply(), unavailable_message());
        assert!(!ex.reply().contains("overloaded"));
        assert_eq!(llm.calls(), 1, "non-rate-limit failure must not rotate");
    }
}

#[tokio::test]
async fn request_carries_prior_history_not_new_turns() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm.clone(), &["A"]);

    a.exchange(greeting(), "first question").await.unwrap();

    let requests = llm.requests.lock().unwrap();
    let contents = &requests[0].1.contents;
    // system instruction, greeting, new message
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[2].parts[0].text, "first question");
    assert!(contents[0].parts[0].text.contains(clinic::PHONE_DISPLAY));
}

#[tokio::test]
async fn successive_exchanges_grow_by_two() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm, &["A"]);
    let mut transcript = greeting();
    for i in 0..4 {
        let len = transcript.len();
        transcript = a.exchange(transcript, &format!("q{i}")).await.unwrap().transcript;
        assert_eq!(transcript.len(), len + 2);
    }
}

// =========================================================================
// validation
// =========================================================================

#[tokio::test]
async fn blank_message_is_rejected_without_calling_provider() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm.clone(), &["A"]);
    let err = a.exchange(greeting(), "   \n").await.unwrap_err();
    assert!(matches!(err, AssistantError::EmptyMessage));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let a = assistant(MockLlm::new(vec![]), &["A"]);
    let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
    let err = a.exchange(greeting(), &long).await.unwrap_err();
    assert!(matches!(err, AssistantError::MessageTooLong { max: MAX_MESSAGE_CHARS }));
    assert_eq!(err.error_code(), "E_MESSAGE_TOO_LONG");
}

#[tokio::test]
async fn long_session_keeps_answering() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm.clone(), &["A"]);
    let mut transcript = greeting();
    for i in 1..=60 {
        let ex = a.exchange(transcript, &format!("question {i}")).await.unwrap();
        assert_eq!(ex.outcome, ReplyOutcome::Answered, "exchange {i}");
        transcript = ex.transcript;
    }
    assert_eq!(transcript.len(), 1 + 60 * 2);

    let requests = llm.requests.lock().unwrap();
    let (_, last) = requests.last().unwrap();
    assert_eq!(last.contents.len(), MAX_HISTORY_TURNS + 2);
    assert_eq!(last.contents.last().unwrap().parts[0].text, "question 60");
}

// =========================================================================
// decline / outcomes
// =========================================================================

#[test]
fn decline_appends_busy_fallback() {
    let llm = MockLlm::new(vec![]);
    let a = assistant(llm.clone(), &["A"]);
    let ex = a.decline(greeting(), "hello", ReplyOutcome::Busy).unwrap();
    assert_eq!(ex.transcript.len(), 3);
    assert_eq!(ex.reply(), BUSY_MESSAGE);
    assert_eq!(llm.calls(), 0);
}

#[test]
fn outcome_from_error_classification() {
    assert_eq!(ReplyOutcome::from_error(&rate_limited()), ReplyOutcome::Busy);
    assert_eq!(ReplyOutcome::from_error(&LlmError::RateLimitExhausted { attempts: 2 }), ReplyOutcome::Busy);
    assert_eq!(ReplyOutcome::from_error(&LlmError::Timeout), ReplyOutcome::Unavailable);
    assert_eq!(ReplyOutcome::from_error(&LlmError::ApiRequest("refused".into())), ReplyOutcome::Unavailable);
    assert_eq!(ReplyOutcome::from_error(&server_error()), ReplyOutcome::Unavailable);
}

#[test]
fn unavailable_message_points_to_phone() {
    assert!(unavailable_message().contains(clinic::PHONE_DISPLAY));
    assert!(ReplyOutcome::Answered.fallback_message().is_none());
}

#[test]
fn outcome_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ReplyOutcome::Unavailable).unwrap(), "\"unavailable\"");
}
