use ice_canonical::{compute_fingerprint, verify_fingerprint, Canonicalizer, Fingerprint};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn fingerprint_serializes_as_bare_string() {
    let fp = Fingerprint::parse("0".repeat(64)).unwrap();
    assert_eq!(
        serde_json::to_string(&fp).unwrap(),
        format!("\"{}\"", "0".repeat(64))
    );
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let canonicalizer = Canonicalizer::new();
    let value = json!({"b": 1, "a": {"nested": 2}});
    let bytes = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(bytes, br#"{"a":{"nested":2},"b":1}"#.to_vec());
}

#[test]
fn verify_detects_modified_value() {
    let canonicalizer = Canonicalizer::new();
    let original = json!({"event_id": "e1", "payload": {"n": 1}});
    let fp = compute_fingerprint(&original, &canonicalizer).unwrap();

    assert!(verify_fingerprint(&original, &fp, &canonicalizer).unwrap());

    let tampered = json!({"event_id": "e1", "payload": {"n": 2}});
    assert!(!verify_fingerprint(&tampered, &fp, &canonicalizer).unwrap());
}

#[test]
fn fingerprint_is_lowercase_hex() {
    let fp = compute_fingerprint(&json!({"a": [1, 2, 3]}), &Canonicalizer::new()).unwrap();
    assert_eq!(fp.as_str().len(), 64);
    assert!(fp
        .as_str()
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

proptest! {
    #[test]
    fn key_order_never_changes_fingerprint(a in ".*", b in any::<i64>(), c in any::<bool>()) {
        let canonicalizer = Canonicalizer::new();
        let mut first = serde_json::Map::new();
        first.insert("a".into(), json!(a));
        first.insert("b".into(), json!(b));
        first.insert("c".into(), json!(c));

        let mut second = serde_json::Map::new();
        second.insert("c".into(), json!(c));
        second.insert("a".into(), json!(a));
        second.insert("b".into(), json!(b));

        let left = compute_fingerprint(&first, &canonicalizer).unwrap();
        let right = compute_fingerprint(&second, &canonicalizer).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn distinct_strings_give_distinct_fingerprints(a in "[a-z]{1,16}", b in "[a-z]{1,16}") {
        prop_assume!(a != b);
        let canonicalizer = Canonicalizer::new();
        let left = compute_fingerprint(&json!({"v": a}), &canonicalizer).unwrap();
        let right = compute_fingerprint(&json!({"v": b}), &canonicalizer).unwrap();
        prop_assert_ne!(left, right);
    }
}
