use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat field-name to scalar mapping stored for each cached entity
pub type Payload = Map<String, Value>;

/// Cached copy of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub key: String,
    pub payload: Payload,
    pub updated_at: DateTime<Utc>,
}

/// Cache key for a payload.
///
/// Strings are used as is, other scalars are stringified. Payloads without the
/// key field (or with a null there) have no key.
pub fn payload_key(payload: &Payload, key_field: &str) -> Option<String> {
    match payload.get(key_field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten a serializable record into a payload
pub fn to_payload<T: Serialize>(record: &T) -> Result<Payload, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_payload_key_uses_string_as_is() {
        let p = payload(json!({"name": "h1", "cpu": 4}));
        assert_eq!(payload_key(&p, "name").as_deref(), Some("h1"));
    }

    #[test]
    fn test_payload_key_stringifies_scalars() {
        let p = payload(json!({"id": 17}));
        assert_eq!(payload_key(&p, "id").as_deref(), Some("17"));
    }

    #[test]
    fn test_payload_key_missing_or_null() {
        let p = payload(json!({"name": null, "cpu": 4}));
        assert_eq!(payload_key(&p, "name"), None);
        assert_eq!(payload_key(&p, "label"), None);
    }
}
