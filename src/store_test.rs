use super::*;

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_store_missing_key_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("nope").unwrap().is_none());
}

#[test]
fn memory_store_set_then_get() {
    let mut store = MemoryStore::new();
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn memory_store_set_overwrites() {
    let mut store = MemoryStore::new();
    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn memory_store_keys_are_independent() {
    let mut store = MemoryStore::new();
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

// =============================================================
// StoreError
// =============================================================

#[test]
fn capacity_error_displays_reason() {
    let err = StoreError::Capacity("quota exceeded".to_owned());
    let msg = err.to_string();
    assert!(msg.contains("quota exceeded"));
}

#[test]
fn corrupt_error_wraps_serde() {
    let parse_err = serde_json::from_str::<Vec<i32>>("not json").unwrap_err();
    let err = StoreError::from(parse_err);
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn unavailable_error_message() {
    let msg = StoreError::Unavailable.to_string();
    assert!(msg.contains("no local store"));
}
