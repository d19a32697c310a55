//! Canonical hashing of snapshots.
//!
//! The snapshot is serialized with object keys sorted at every level (array
//! order is content and is preserved), hashed with SHA256, and truncated to
//! the first [`HASH_LEN`] hex characters.
//!
//! ## Determinism Guarantees
//!
//! - Structurally equal snapshots hash equally, whatever the key insertion order
//! - Reordering an array changes the hash
//!
//! Truncation leaves a birthday bound of roughly 2^32 snapshots, which is
//! fine for a gate reviewed by humans; it is not an integrity boundary.

use crate::errors::Result;
use crate::snapshot::model::ApiSurfaceSnapshot;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA256 digest
pub const HASH_LEN: usize = 16;

/// Recursively sort object keys; arrays keep their order.
pub fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut out = Map::with_capacity(map.len());
            for (key, child) in entries {
                out.insert(key.clone(), canonical_json(child));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Canonical JSON text of a snapshot.
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if the snapshot cannot be serialized.
pub fn canonical_string(snapshot: &ApiSurfaceSnapshot) -> Result<String> {
    let value = serde_json::to_value(snapshot)?;
    Ok(canonical_value_string(&value)?)
}

/// Canonical JSON text of an arbitrary value.
///
/// Object keys are sorted at every level; array order is kept.
pub fn canonical_value_string(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(&canonical_json(value))
}

/// Compute the 16-hex-character content hash of a snapshot.
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if the snapshot cannot be serialized.
///
/// ## Example
///
/// ```
/// use ontolock_core::snapshot::{hash_snapshot, ApiSurfaceSnapshot};
/// use std::collections::BTreeMap;
///
/// let snapshot = ApiSurfaceSnapshot {
///     name: "tickets".into(),
///     access_groups: vec!["admin".into()],
///     entities: vec![],
///     functions: BTreeMap::new(),
/// };
/// let hash = hash_snapshot(&snapshot).unwrap();
/// assert_eq!(hash.len(), 16);
/// ```
pub fn hash_snapshot(snapshot: &ApiSurfaceSnapshot) -> Result<String> {
    let canonical = canonical_string(snapshot)?;
    Ok(hash_string(&canonical))
}

/// Whether `s` has the shape of a snapshot hash (16 lowercase hex chars).
pub fn is_valid_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut hex = hex::encode(hasher.finalize());
    hex.truncate(HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_string_deterministic() {
        let hash1 = hash_string("test");
        let hash2 = hash_string("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), HASH_LEN);
        assert!(is_valid_hash(&hash1));
    }

    #[test]
    fn test_hash_string_is_sha256_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(hash_string("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn test_canonical_json_sorts_object_keys_recursively() {
        let value = json!({"b": 1, "a": {"d": 4, "c": 3}});
        assert_eq!(
            canonical_value_string(&value).unwrap(),
            r#"{"a":{"c":3,"d":4},"b":1}"#
        );
    }

    #[test]
    fn test_canonical_json_preserves_array_order() {
        let value = json!({"a": [{"b": 2}, {"a": 1}]});
        assert_eq!(
            canonical_value_string(&value).unwrap(),
            r#"{"a":[{"b":2},{"a":1}]}"#
        );
    }

    #[test]
    fn test_is_valid_hash() {
        assert!(is_valid_hash("0123456789abcdef"));
        assert!(!is_valid_hash("0123456789ABCDEF"));
        assert!(!is_valid_hash("0123456789abcde"));
        assert!(!is_valid_hash("0123456789abcdeg"));
    }
}
