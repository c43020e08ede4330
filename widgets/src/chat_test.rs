use super::*;

fn turn(role: Role, text: &str, timestamp_ms: i64) -> Turn {
    Turn { role, text: text.into(), timestamp_ms }
}

// =============================================================
// Transcript
// =============================================================

#[test]
fn with_greeting_starts_with_one_assistant_turn() {
    let t = Transcript::with_greeting("Welcome");
    assert_eq!(t.len(), 1);
    assert_eq!(t.turns()[0].role, Role::Assistant);
    assert_eq!(t.turns()[0].text, "Welcome");
}

#[test]
fn push_appends_in_order() {
    let mut t = Transcript::new();
    t.push(Role::User, "hi");
    t.push(Role::Assistant, "hello");
    let roles: Vec<Role> = t.turns().iter().map(|x| x.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(t.last().map(|x| x.text.as_str()), Some("hello"));
}

#[test]
fn push_never_stamps_earlier_than_previous_turn() {
    let mut t = Transcript::new();
    t.push_at(Role::User, "later", 2_000);
    let stamped = t.push_at(Role::Assistant, "clock went back", 1_000).timestamp_ms;
    assert_eq!(stamped, 2_000);
}

#[test]
fn try_from_accepts_ordered_turns() {
    let turns = vec![turn(Role::Assistant, "a", 1), turn(Role::User, "b", 1), turn(Role::Assistant, "c", 5)];
    let t = Transcript::try_from(turns).unwrap();
    assert_eq!(t.len(), 3);
}

#[test]
fn try_from_rejects_out_of_order_turns() {
    let turns = vec![turn(Role::User, "a", 10), turn(Role::Assistant, "b", 9)];
    assert_eq!(Transcript::try_from(turns), Err(TranscriptError::OutOfOrder { index: 1 }));
}

#[test]
fn try_from_rejects_blank_turn() {
    let turns = vec![turn(Role::User, "  ", 10)];
    assert_eq!(Transcript::try_from(turns), Err(TranscriptError::EmptyTurn { index: 0 }));
}

#[test]
fn deserialize_rejects_unknown_role() {
    let json = r#"[{"role":"system","text":"x","timestamp_ms":1}]"#;
    assert!(serde_json::from_str::<Transcript>(json).is_err());
}

#[test]
fn deserialize_validates_order() {
    let json = r#"[{"role":"user","text":"a","timestamp_ms":5},{"role":"assistant","text":"b","timestamp_ms":4}]"#;
    let err = serde_json::from_str::<Transcript>(json).unwrap_err();
    assert!(err.to_string().contains("timestamped before"));
}

#[test]
fn serializes_as_plain_turn_array() {
    let mut t = Transcript::new();
    t.push_at(Role::User, "hi", 7);
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json, serde_json::json!([{ "role": "user", "text": "hi", "timestamp_ms": 7 }]));
}

// =============================================================
// ChatPanel
// =============================================================

#[test]
fn panel_starts_closed_with_greeting() {
    let panel = ChatPanel::new("Welcome");
    assert!(!panel.is_open());
    assert!(!panel.is_loading());
    assert_eq!(panel.transcript().len(), 1);
}

#[test]
fn toggle_flips_open() {
    let mut panel = ChatPanel::new("Welcome");
    panel.toggle();
    assert!(panel.is_open());
    panel.toggle();
    assert!(!panel.is_open());
}

#[test]
fn begin_send_trims_and_clears_draft() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("  back pain?  ");
    assert_eq!(panel.begin_send().as_deref(), Some("back pain?"));
    assert_eq!(panel.draft(), "");
    assert!(panel.is_loading());
    assert_eq!(panel.pending(), Some("back pain?"));
}

#[test]
fn begin_send_refuses_blank_draft() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("   ");
    assert_eq!(panel.begin_send(), None);
    assert!(!panel.is_loading());
}

#[test]
fn begin_send_refuses_while_loading() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("one");
    assert!(panel.begin_send().is_some());
    panel.set_draft("two");
    assert_eq!(panel.begin_send(), None);
    assert_eq!(panel.draft(), "two");
}

#[test]
fn finish_adopts_transcript() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("hi");
    panel.begin_send();
    let mut next = panel.transcript().clone();
    next.push(Role::User, "hi");
    next.push(Role::Assistant, "hello");
    panel.finish(next);
    assert!(!panel.is_loading());
    assert_eq!(panel.transcript().len(), 3);
}

#[test]
fn fail_records_message_and_fallback() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("hi");
    panel.begin_send();
    panel.fail("call us");
    assert!(!panel.is_loading());
    let texts: Vec<&str> = panel.transcript().turns().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Welcome", "hi", "call us"]);
}

#[test]
fn fail_without_pending_is_noop() {
    let mut panel = ChatPanel::new("Welcome");
    panel.fail("call us");
    assert_eq!(panel.transcript().len(), 1);
}

#[test]
fn reject_restores_draft_without_recording() {
    let mut panel = ChatPanel::new("Welcome");
    panel.set_draft("  hi  ");
    panel.begin_send();
    panel.reject();
    assert!(!panel.is_loading());
    assert_eq!(panel.draft(), "hi");
    assert_eq!(panel.transcript().len(), 1);
}
