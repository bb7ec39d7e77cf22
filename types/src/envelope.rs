//! JSON-RPC 2.0 envelope types carried inside a [`crate::Frame`] payload.
//!
//! Requests are parsed field-by-field by the dispatcher rather than via a
//! single `Deserialize` impl, because each missing/malformed field maps to
//! a distinct, specifically worded error (see the dispatcher's algorithm).
//! This module only provides the data shapes and the `id` round-trip rule:
//! JSON-RPC allows any JSON value as an id, but this implementation only
//! accepts a string or an integer — a floating-point id is rejected rather
//! than silently truncated.

use serde::Serialize;
use serde_json::Value;

/// A JSON-RPC request or response id. JSON-RPC technically allows any
/// scalar; this engine narrows that to string or integer, matching
/// observed client behavior and keeping the echo round trip exact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonRpcId {
    String(String),
    Number(i64),
}

impl JsonRpcId {
    /// Extracts an id from a raw JSON value. Returns `Ok(None)` when the
    /// `id` key is absent, `Ok(Some(_))` for a string or integer id, and
    /// `Err(())` for anything else (float, bool, array, object, null).
    pub fn from_value(value: Option<&Value>) -> Result<Option<Self>, ()> {
        match value {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(JsonRpcId::String(s.clone()))),
            Some(Value::Number(n)) => n.as_i64().map(JsonRpcId::Number).map(Some).ok_or(()),
            Some(_) => Err(()),
        }
    }
}

impl Serialize for JsonRpcId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            JsonRpcId::String(s) => serializer.serialize_str(s),
            JsonRpcId::Number(n) => serializer.serialize_i64(*n),
        }
    }
}

/// A parsed incoming call. `params` is the raw JSON value, validated
/// separately against a procedure's input schema if one is registered.
#[derive(Clone, Debug)]
pub struct JsonRpcRequest {
    pub id: Option<JsonRpcId>,
    pub method: String,
    pub params: Option<Value>,
}

/// The `{code, message}` pair carried in an error response, using the
/// gRPC status integers listed in [`crate::GrpcStatus`].
#[derive(Clone, Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Either a successful result or an error, always tagged with `"jsonrpc":
/// "2.0"` and an echoed (or absent) id. Serializes by hand so the id can be
/// omitted entirely rather than emitted as `null` on envelope-parse
/// failures that never got far enough to read one.
#[derive(Clone, Debug)]
pub struct JsonRpcResponse {
    pub id: Option<JsonRpcId>,
    pub outcome: JsonRpcOutcome,
}

#[derive(Clone, Debug)]
pub enum JsonRpcOutcome {
    Success(Value),
    Error(JsonRpcError),
}

impl JsonRpcResponse {
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self { id, outcome: JsonRpcOutcome::Success(result) }
    }

    pub fn error(id: Option<JsonRpcId>, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: JsonRpcOutcome::Error(JsonRpcError { code, message: message.into() }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, JsonRpcOutcome::Error(_))
    }

    /// Renders the envelope as a `serde_json::Value`, omitting `id` when
    /// absent rather than serializing `id: null`.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
        if let Some(id) = &self.id {
            map.insert("id".to_string(), serde_json::to_value(id).expect("id always serializes"));
        }
        match &self.outcome {
            JsonRpcOutcome::Success(result) => {
                map.insert("result".to_string(), result.clone());
            }
            JsonRpcOutcome::Error(err) => {
                map.insert(
                    "error".to_string(),
                    serde_json::to_value(err).expect("error always serializes"),
                );
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_string_and_integer() {
        let s = JsonRpcId::from_value(Some(&Value::String("abc".into()))).unwrap();
        assert_eq!(s, Some(JsonRpcId::String("abc".into())));

        let n = JsonRpcId::from_value(Some(&Value::from(42))).unwrap();
        assert_eq!(n, Some(JsonRpcId::Number(42)));

        let absent = JsonRpcId::from_value(None).unwrap();
        assert_eq!(absent, None);
    }

    #[test]
    fn id_rejects_float() {
        let err = JsonRpcId::from_value(Some(&Value::from(1.5)));
        assert!(err.is_err());
    }

    #[test]
    fn response_omits_id_when_absent() {
        let resp = JsonRpcResponse::error(None, 3, "bad request");
        let value = resp.to_value();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn success_response_echoes_string_id() {
        let resp = JsonRpcResponse::success(
            Some(JsonRpcId::String("1".into())),
            serde_json::json!({"ok": true}),
        );
        let value = resp.to_value();
        assert_eq!(value["id"], serde_json::json!("1"));
        assert_eq!(value["result"]["ok"], serde_json::json!(true));
    }
}
