//! Cache Entry Module
//!
//! Value encoding for stored entries and the expiry records that track TTLs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Suffix appended to a collection name to form its expiry side collection.
pub const EXPIRES_SUFFIX: &str = ":expires";

/// Scan pattern matching every expiry side collection.
pub const EXPIRES_PATTERN: &str = "*:expires";

// == Expiry Record ==
/// Expiry metadata for one TTL-bearing entry.
///
/// Stored JSON-encoded in `<name>:expires` under the same key as the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryRecord {
    /// Owning collection name
    pub name: String,
    /// Key of the entry inside the owning collection
    pub key: String,
    /// Absolute expiry timestamp (Unix milliseconds)
    pub at: i64,
}

impl ExpiryRecord {
    // == Constructor ==
    /// Creates a record expiring `ttl_ms` milliseconds from now.
    pub fn new(name: impl Into<String>, key: impl Into<String>, ttl_ms: u64) -> Self {
        let ttl = i64::try_from(ttl_ms).unwrap_or(i64::MAX);
        Self {
            name: name.into(),
            key: key.into(),
            at: current_timestamp_ms().saturating_add(ttl),
        }
    }

    // == Is Expired ==
    /// An entry is dead once `now` is strictly past `at`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Name of the expiry side collection for `collection`.
pub fn expires_collection(collection: &str) -> String {
    format!("{collection}{EXPIRES_SUFFIX}")
}

// == Value Encoding ==
/// Encodes a value for storage. Everything is stored as JSON text.
pub fn encode_value(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a stored value.
///
/// Text that is not valid JSON comes back as a plain string, so foreign
/// writers storing raw scalars never make a read fail.
pub fn decode_value(raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw),
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_creation() {
        let before = current_timestamp_ms();
        let record = ExpiryRecord::new("user_dms", "42", 60_000);

        assert_eq!(record.name, "user_dms");
        assert_eq!(record.key, "42");
        assert!(record.at >= before + 60_000);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let record = ExpiryRecord {
            name: "c".to_string(),
            key: "k".to_string(),
            at: 1_000,
        };

        assert!(!record.is_expired_at(1_000), "not expired exactly at `at`");
        assert!(record.is_expired_at(1_001));
    }

    #[test]
    fn test_record_wire_format() {
        let record = ExpiryRecord {
            name: "channels".to_string(),
            key: "1".to_string(),
            at: 99,
        };
        let raw = record.encode().unwrap();
        assert_eq!(raw, r#"{"name":"channels","key":"1","at":99}"#);
        assert_eq!(ExpiryRecord::decode(&raw).unwrap(), record);
    }

    #[test]
    fn test_record_decode_garbage() {
        assert!(ExpiryRecord::decode("not json").is_err());
    }

    #[test]
    fn test_expires_collection_name() {
        assert_eq!(expires_collection("roles:1"), "roles:1:expires");
    }

    #[test]
    fn test_decode_falls_back_to_raw_text() {
        assert_eq!(decode_value("plain".to_string()), json!("plain"));
        assert_eq!(decode_value("{broken".to_string()), json!("{broken"));
    }

    #[test]
    fn test_string_values_survive_encoding() {
        // numeric-looking ids must not come back as numbers
        let raw = encode_value(&json!("123456789")).unwrap();
        assert_eq!(decode_value(raw), json!("123456789"));
    }
}
