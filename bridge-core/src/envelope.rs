//! The uniform two-variant JSON response wrapper.
//!
//! Every response the gateway emits, success or failure, serializes to
//! either `{"status":"ok","data":...}` or `{"status":"error","error":...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    /// Successful response carrying an arbitrary JSON payload.
    Ok { data: Value },
    /// Failed response carrying a human-readable message.
    Error { error: String },
}

impl Envelope {
    /// Wrap a success payload.
    #[must_use]
    pub fn ok(data: impl Into<Value>) -> Self {
        Envelope::Ok { data: data.into() }
    }

    /// Wrap an error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_serializes_with_status_tag() {
        let env = Envelope::ok(json!({"id": "abc"}));
        let value = match serde_json::to_value(&env) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(value, json!({"status": "ok", "data": {"id": "abc"}}));
    }

    #[test]
    fn error_envelope_serializes_with_error_field() {
        let env = Envelope::error("missing fields");
        let value = match serde_json::to_value(&env) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(value, json!({"status": "error", "error": "missing fields"}));
    }

    #[test]
    fn envelope_deserializes_both_variants() {
        let ok: Envelope = match serde_json::from_str(r#"{"status":"ok","data":42}"#) {
            Ok(v) => v,
            Err(e) => panic!("deserialization failed: {e}"),
        };
        assert_eq!(ok, Envelope::ok(42));

        let err: Envelope = match serde_json::from_str(r#"{"status":"error","error":"boom"}"#) {
            Ok(v) => v,
            Err(e) => panic!("deserialization failed: {e}"),
        };
        assert_eq!(err, Envelope::error("boom"));
    }
}
