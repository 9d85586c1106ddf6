//! Content fingerprints (entity tags)

use std::fmt;

use axum::http::HeaderValue;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::AppResult;

/// An entity tag: `"hex"` (strong) or `W/"hex"` (weak)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTag {
    weak: bool,
    opaque: String,
}

impl EntityTag {
    /// Strong tag over the canonical form of `value` (single resources)
    pub fn strong<T: Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self {
            weak: false,
            opaque: fingerprint(value)?,
        })
    }

    /// Weak tag over the canonical form of `value` (collections)
    pub fn weak<T: Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self {
            weak: true,
            opaque: fingerprint(value)?,
        })
    }

    /// Parse one tag as sent by a client. Unquoted tags are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (weak, rest) = match raw.strip_prefix("W/") {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let opaque = rest.trim_matches('"');
        if opaque.is_empty() {
            return None;
        }
        Some(Self {
            weak,
            opaque: opaque.to_string(),
        })
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    /// Compare ignoring the weak marker
    pub fn matches(&self, other: &EntityTag) -> bool {
        self.opaque == other.opaque
    }

    pub fn header_value(&self) -> HeaderValue {
        // hex digits and quotes are always valid header bytes
        HeaderValue::from_str(&self.to_string()).unwrap_or_else(|_| HeaderValue::from_static("\"\""))
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/\"{}\"", self.opaque)
        } else {
            write!(f, "\"{}\"", self.opaque)
        }
    }
}

/// Outcome of evaluating a conditional header list
fn list_contains(header: &str, current: &EntityTag) -> bool {
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || EntityTag::parse(candidate).is_some_and(|t| t.matches(current)))
}

/// `If-None-Match`: true when the client already holds `current`
pub fn none_match_hit(header: Option<&HeaderValue>, current: &EntityTag) -> bool {
    header
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| list_contains(h, current))
}

/// `If-Match`: true when the header is absent or lists `current` (or `*`)
pub fn if_match_passes(header: Option<&HeaderValue>, current: &EntityTag) -> bool {
    match header {
        None => true,
        Some(h) => h.to_str().map(|h| list_contains(h, current)).unwrap_or(false),
    }
}

/// sha256 hex of the canonical JSON of `value`
pub fn fingerprint<T: Serialize>(value: &T) -> AppResult<String> {
    let canonical = canonical_json(&serde_json::to_value(value)?);
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Same value with every object's keys in sorted order, recursively
pub fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonical_json(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        other => other.clone(),
    }
}
