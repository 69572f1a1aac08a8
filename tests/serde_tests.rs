#![cfg(feature = "serde")]

//! Integration tests for serde support in multitree.
//!
//! A map serializes as a sequence of `(key, value)` pairs in key order, so
//! duplicates survive a round trip.

use multitree::multimap::TreeMultiMap;
use rstest::rstest;

fn entries<K: Clone, V: Clone>(map: &TreeMultiMap<K, V>) -> Vec<(K, V)> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// =============================================================================
// JSON Round Trip Tests
// =============================================================================

#[rstest]
fn test_multimap_json_roundtrip_keeps_duplicates() {
    let map: TreeMultiMap<i32, String> = [(5, "a"), (3, "b"), (8, "c"), (3, "d")]
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect();

    let json = serde_json::to_string(&map).unwrap();
    let restored: TreeMultiMap<i32, String> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), 4);
    assert_eq!(entries(&restored), entries(&map));
    assert_eq!(restored.count(&3), 2);
    assert_eq!(restored.validate(), Ok(()));
}

#[rstest]
fn test_multimap_json_format_is_sequence_of_pairs() {
    let map: TreeMultiMap<i32, &str> = [(2, "x"), (1, "y"), (2, "z")].into_iter().collect();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"[[1,"y"],[2,"x"],[2,"z"]]"#);
}

#[rstest]
fn test_multimap_deserializes_unsorted_input() {
    let json = r#"[["pear",1],["apple",2],["fig",3],["apple",4]]"#;
    let map: TreeMultiMap<String, i32> = serde_json::from_str(json).unwrap();

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["apple", "apple", "fig", "pear"]);
    assert_eq!(map.get("fig"), Some(&3));
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
fn test_multimap_nested_values() {
    let map: TreeMultiMap<u8, Vec<u8>> = [(1, vec![1, 2]), (0, vec![]), (1, vec![3])]
        .into_iter()
        .collect();

    let json = serde_json::to_string(&map).unwrap();
    let restored: TreeMultiMap<u8, Vec<u8>> = serde_json::from_str(&json).unwrap();
    assert_eq!(entries(&restored), entries(&map));
}

// =============================================================================
// Edge Case Tests
// =============================================================================

#[rstest]
fn test_empty_multimap_roundtrip() {
    let empty: TreeMultiMap<String, i32> = TreeMultiMap::new();
    let json = serde_json::to_string(&empty).unwrap();
    assert_eq!(json, "[]");

    let restored: TreeMultiMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.begin(), restored.end());
}

#[rstest]
fn test_invalid_json_returns_error() {
    let result: Result<TreeMultiMap<String, i32>, _> = serde_json::from_str(r#"{"a": 1}"#);
    assert!(result.is_err());

    let result: Result<TreeMultiMap<String, i32>, _> = serde_json::from_str(r#"[["a", "one"]]"#);
    assert!(result.is_err());
}
