use super::*;

#[test]
fn blank_keys_are_dropped() {
    let ring = CredentialRing::new(["A", "", "  ", "B"]).unwrap();
    assert_eq!(ring.len(), 2);
}

#[test]
fn empty_ring_is_rejected() {
    let err = CredentialRing::new(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, LlmError::NoCredentials { .. }));
    assert!(CredentialRing::new([""]).is_err());
}

#[test]
fn cursor_walks_in_order_then_stops() {
    let ring = CredentialRing::new(["A", "B"]).unwrap();
    let mut cursor = ring.cursor();
    assert_eq!(cursor.next_key(), Some((0, "A")));
    assert_eq!(cursor.remaining(), 1);
    assert_eq!(cursor.next_key(), Some((1, "B")));
    assert_eq!(cursor.next_key(), None);
    assert_eq!(cursor.attempts(), 2);
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn each_cursor_starts_at_front() {
    let ring = CredentialRing::new(["A", "B"]).unwrap();
    let mut first = ring.cursor();
    first.next_key();
    first.next_key();
    assert_eq!(ring.cursor().next_key(), Some((0, "A")));
}

#[test]
fn debug_does_not_reveal_keys() {
    let ring = CredentialRing::new(["sk-super-secret"]).unwrap();
    let rendered = format!("{ring:?}");
    assert!(!rendered.contains("sk-super-secret"));
    assert!(rendered.contains("keys: 1"));
}
