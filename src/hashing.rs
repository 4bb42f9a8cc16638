//! Key hashing: maps any `Value` to the canonical token maps index on.
//!
//! Tokens are pure functions of the key and stable for the process
//! lifetime. They are not the bucket hashes the maps use internally; those
//! come from the map's `BuildHasher` applied to the token.

use crate::value::Value;
use chrono::SecondsFormat;
use core::fmt;
use serde_json::{json, Value as Json};

/// Canonical lookup key derived from a `Value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashToken {
    Int(i64),
    Str(String),
}

impl fmt::Display for HashToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashToken::Int(i) => write!(f, "{i}"),
            HashToken::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Which canonicalization rule a key falls under, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyClass {
    Temporal,
    Identity,
    Boolean,
    Null,
    Composite,
    Integral,
    Scalar,
}

impl KeyClass {
    pub fn of(key: &Value) -> Self {
        match key {
            Value::Temporal(_) => KeyClass::Temporal,
            Value::Object(_) => KeyClass::Identity,
            Value::Bool(_) => KeyClass::Boolean,
            Value::Null => KeyClass::Null,
            Value::Composite(_) => KeyClass::Composite,
            Value::Int(_) => KeyClass::Integral,
            Value::Float(_) | Value::Str(_) => KeyClass::Scalar,
        }
    }
}

/// Canonical token for `key`.
///
/// String keys map to themselves, so a string spelled like another class's
/// token (`"_true"`, `"_null"`, a composite digest) addresses the same entry
/// as that key.
pub fn hash_key(key: &Value) -> HashToken {
    match key {
        Value::Temporal(t) => HashToken::Str(format!(
            "_{}",
            t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
        )),
        Value::Object(o) => HashToken::Str(format!("_#{}", o.id())),
        Value::Bool(true) => HashToken::Str("_true".to_string()),
        Value::Bool(false) => HashToken::Str("_false".to_string()),
        Value::Null => HashToken::Str("_null".to_string()),
        Value::Composite(items) => HashToken::Str(format!("_{}", composite_digest(items))),
        Value::Int(i) => HashToken::Int(*i),
        Value::Float(x) => HashToken::Str(x.to_string()),
        Value::Str(s) => HashToken::Str(s.clone()),
    }
}

/// Hex blake3 digest of the sorted, JSON-encoded contents.
fn composite_digest(items: &[Value]) -> String {
    let encoded = canonical_items(items).to_string();
    blake3::hash(encoded.as_bytes()).to_hex().to_string()
}

fn canonical_items(items: &[Value]) -> Json {
    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort();
    Json::Array(sorted.into_iter().map(canonical_json).collect())
}

fn canonical_json(v: &Value) -> Json {
    match v {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(Json::Number)
            .unwrap_or_else(|| json!({ "float": x.to_string() })),
        Value::Str(s) => Json::String(s.clone()),
        Value::Temporal(t) => json!({ "temporal": t.to_rfc3339_opts(SecondsFormat::AutoSi, false) }),
        Value::Composite(items) => canonical_items(items),
        Value::Object(o) => json!({ "object": o.id() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    /// Invariant: the fixed constants for true/false/null are pairwise distinct.
    #[test]
    fn constant_tokens_are_distinct() {
        let t = hash_key(&Value::Bool(true));
        let f = hash_key(&Value::Bool(false));
        let n = hash_key(&Value::Null);
        assert_ne!(t, f);
        assert_ne!(t, n);
        assert_ne!(f, n);
    }

    /// Invariant: integral keys get numeric tokens, other scalars string tokens.
    #[test]
    fn scalar_tokens() {
        assert_eq!(hash_key(&Value::Int(7)), HashToken::Int(7));
        assert_eq!(hash_key(&Value::from("7")), HashToken::Str("7".into()));
        assert_eq!(hash_key(&Value::Float(1.5)), HashToken::Str("1.5".into()));
    }

    /// Invariant: composite tokens ignore element order and are stable.
    #[test]
    fn composite_tokens_are_order_insensitive() {
        let a = Value::from(vec![3, 1, 2]);
        let b = Value::from(vec![1, 2, 3]);
        assert_eq!(hash_key(&a), hash_key(&b));
        assert_eq!(hash_key(&a), hash_key(&a.clone()));
        assert_ne!(hash_key(&a), hash_key(&Value::from(vec![1, 2])));
        // String "1" and integer 1 stay distinct inside a composite.
        assert_ne!(
            hash_key(&Value::from(vec![Value::from("1")])),
            hash_key(&Value::from(vec![1]))
        );
    }

    /// Invariant: distinct identity objects never share a token.
    #[test]
    fn identity_tokens() {
        let a = Value::object(1u8);
        let b = Value::object(1u8);
        assert_ne!(hash_key(&a), hash_key(&b));
        assert_eq!(hash_key(&a), hash_key(&a.clone()));
        assert_eq!(KeyClass::of(&a), KeyClass::Identity);
    }

    #[test]
    fn temporal_tokens_use_iso_8601() {
        let t = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2013, 5, 1, 12, 30, 0)
            .unwrap();
        assert_eq!(
            hash_key(&Value::from(t)),
            HashToken::Str("_2013-05-01T12:30:00+01:00".into())
        );
        assert_eq!(KeyClass::of(&Value::from(t)), KeyClass::Temporal);
    }
}
