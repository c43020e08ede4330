use super::*;

fn record(id: u32, rating: u8) -> serde_json::Value {
    serde_json::json!({ "id": id, "author": format!("A{id}"), "role": "Patient", "rating": rating, "text": "ok" })
}

#[test]
fn embedded_list_loads() {
    let records = load().unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].author, "Shipra Bhandari");
    assert!(records.iter().all(|r| (1..=5).contains(&r.rating)));
}

#[test]
fn parse_rejects_rating_out_of_range() {
    for bad in [0u8, 6] {
        let json = serde_json::json!([record(1, 5), record(2, bad)]).to_string();
        let err = parse(&json).unwrap_err();
        assert!(matches!(err, TestimonialError::RatingOutOfRange { id: 2, rating } if rating == bad));
    }
}

#[test]
fn parse_rejects_duplicate_ids() {
    let json = serde_json::json!([record(1, 5), record(1, 4)]).to_string();
    assert!(matches!(parse(&json), Err(TestimonialError::DuplicateId(1))));
}

#[test]
fn parse_rejects_malformed_json() {
    let err = parse("[{\"id\": 1}]").unwrap_err();
    assert_eq!(err.error_code(), "E_TESTIMONIAL_PARSE");
}

#[test]
fn window_wraps_around_the_end() {
    let records = load().unwrap();
    let ids: Vec<u32> = window(&records, 7, 3).unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![8, 1, 2]);
}

#[test]
fn window_position_wraps_modulo_len() {
    let records = load().unwrap();
    let a: Vec<u32> = window(&records, 1, 3).unwrap().iter().map(|r| r.id).collect();
    let b: Vec<u32> = window(&records, 9, 3).unwrap().iter().map(|r| r.id).collect();
    assert_eq!(a, b);
}

#[test]
fn window_count_is_clamped_to_list() {
    let records = load().unwrap();
    let w = window(&records, 0, 50).unwrap();
    assert_eq!(w.len(), records.len());
    let ids: HashSet<u32> = w.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), records.len());
}

#[test]
fn window_over_empty_list_is_empty() {
    assert!(window(&[], 3, 3).unwrap().is_empty());
}
