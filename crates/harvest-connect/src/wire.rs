//! Wire-level helpers: optional unwrapping and the response envelope
//!
//! Candid `opt T` reaches us in two shapes depending on nesting depth: a
//! zero-or-one element array (`[]` / `[x]`) or a direct nullable value. Every
//! call site goes through the primitives below so the shapes are handled the
//! same way everywhere.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConnectError;

/// Unwrap one level of optional.
///
/// - `null` is absent
/// - an empty array is absent, a non-empty array yields its first element
/// - any other value is returned unchanged
pub fn unwrap_opt(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => items.into_iter().next().filter(|v| !v.is_null()),
        other => Some(other),
    }
}

/// Unwrap two levels of optional. Absence at either level is absence.
pub fn unwrap_double_opt(value: Value) -> Option<Value> {
    unwrap_opt(value).and_then(unwrap_opt)
}

/// Unwrap an optional text value. Empty strings count as absent.
pub fn unwrap_text(value: Value) -> Option<String> {
    let text = match unwrap_opt(value)? {
        Value::String(s) => s,
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Decode a plain wire value into a typed entity.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ConnectError> {
    Ok(serde_json::from_value(value)?)
}

/// The `{ success, data, error }` record every marketplace procedure
/// (except `health_check`) returns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteEnvelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub data: Value,

    #[serde(default)]
    pub error: Value,
}

impl RemoteEnvelope {
    /// Parse an envelope out of a raw wire value.
    pub fn from_wire(value: Value) -> Result<Self, ConnectError> {
        decode(value)
    }

    /// Build the failure for this envelope, preferring the canister's own
    /// message over `fallback`.
    fn failure(error: Value, fallback: &str) -> ConnectError {
        ConnectError::Rejected(unwrap_text(error).unwrap_or_else(|| fallback.to_string()))
    }

    /// Success with possibly absent data. Absent data is `Ok(None)`.
    pub fn into_optional(self, fallback: &str) -> Result<Option<Value>, ConnectError> {
        if self.success {
            Ok(unwrap_opt(self.data))
        } else {
            Err(Self::failure(self.error, fallback))
        }
    }

    /// Success with an optional-of-optional payload. Absence at either
    /// level is `Ok(None)`.
    pub fn into_double_optional(self, fallback: &str) -> Result<Option<Value>, ConnectError> {
        if self.success {
            Ok(unwrap_double_opt(self.data))
        } else {
            Err(Self::failure(self.error, fallback))
        }
    }

    /// Success that must carry data. Absent data takes the error path.
    pub fn into_required(self, fallback: &str) -> Result<Value, ConnectError> {
        if self.success {
            if let Some(data) = unwrap_opt(self.data) {
                return Ok(data);
            }
        }
        Err(Self::failure(self.error, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_opt_shapes() {
        assert_eq!(unwrap_opt(Value::Null), None);
        assert_eq!(unwrap_opt(json!([])), None);
        assert_eq!(unwrap_opt(json!([{"id": "a"}])), Some(json!({"id": "a"})));
        assert_eq!(unwrap_opt(json!({"id": "a"})), Some(json!({"id": "a"})));
        assert_eq!(unwrap_opt(json!("text")), Some(json!("text")));
    }

    #[test]
    fn test_unwrap_opt_singleton_null_is_absent() {
        assert_eq!(unwrap_opt(json!([null])), None);
    }

    #[test]
    fn test_unwrap_double_opt() {
        assert_eq!(unwrap_double_opt(json!([])), None);
        assert_eq!(unwrap_double_opt(json!([[]])), None);
        assert_eq!(unwrap_double_opt(Value::Null), None);
        assert_eq!(unwrap_double_opt(json!([[{"x": 1}]])), Some(json!({"x": 1})));
    }

    #[test]
    fn test_unwrap_text() {
        assert_eq!(unwrap_text(json!(["offer not found"])), Some("offer not found".to_string()));
        assert_eq!(unwrap_text(json!("direct")), Some("direct".to_string()));
        assert_eq!(unwrap_text(json!([])), None);
        assert_eq!(unwrap_text(json!([""])), None);
    }

    #[test]
    fn test_envelope_missing_fields_default() {
        let envelope = RemoteEnvelope::from_wire(json!({"success": true})).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Value::Null);
        assert_eq!(envelope.error, Value::Null);
    }

    #[test]
    fn test_into_optional_singleton_and_empty() {
        let present = RemoteEnvelope::from_wire(json!({"success": true, "data": [5], "error": []}))
            .unwrap();
        assert_eq!(present.into_optional("fallback").unwrap(), Some(json!(5)));

        let absent = RemoteEnvelope::from_wire(json!({"success": true, "data": [], "error": []}))
            .unwrap();
        assert_eq!(absent.into_optional("fallback").unwrap(), None);
    }

    #[test]
    fn test_into_required_absent_data_uses_fallback() {
        let envelope = RemoteEnvelope::from_wire(json!({"success": true, "data": [], "error": []}))
            .unwrap();
        let err = envelope.into_required("Failed to fetch platform stats").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch platform stats");
    }

    #[test]
    fn test_failure_prefers_canister_message() {
        let envelope = RemoteEnvelope::from_wire(
            json!({"success": false, "data": [], "error": ["Caller is not a farmer"]}),
        )
        .unwrap();
        let err = envelope.into_optional("Failed to create offer").unwrap_err();
        assert_eq!(err.to_string(), "Caller is not a farmer");
    }

    #[test]
    fn test_failure_with_present_data_is_still_failure() {
        let envelope =
            RemoteEnvelope::from_wire(json!({"success": false, "data": [[1]], "error": []}))
                .unwrap();
        let err = envelope.into_double_optional("Failed to fetch current user").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch current user");
    }
}
