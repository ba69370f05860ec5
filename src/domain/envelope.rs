use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ResponseErrorMessage;

/// Success sentinel shared by every remote service.
pub const STATUS_OK: i32 = 200;

/// Statuses used by payment callbacks instead of HTTP-like values.
pub const STATUS_ERROR_VALIDATION: i32 = 1;
pub const STATUS_ERROR_SYSTEM: i32 = 2;
pub const STATUS_TEMPORARY: i32 = 4;

/// Remote response wrapper.
///
/// `status` doubles as the HTTP status relayed to the caller, so it is kept
/// as a raw integer. Payload fields (`item`, `items`, `data`, ...) are opaque
/// to the gateway and only projected by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ResponseErrorMessage>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK,
            ..Self::default()
        }
    }

    pub fn with_status(status: i32, message: ResponseErrorMessage) -> Self {
        Self {
            status,
            message: Some(message),
            payload: Map::new(),
        }
    }

    /// Builder used by handlers and tests to attach a payload field.
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.payload.insert(name.to_string(), value);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Takes a payload field, yielding `null` when the remote omitted it.
    pub fn take(&mut self, field: &str) -> Value {
        self.payload.remove(field).unwrap_or(Value::Null)
    }

    pub fn field(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    /// String payload field, empty when absent.
    pub fn str_field(&self, field: &str) -> &str {
        self.payload
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn item(mut self) -> Value {
        self.take("item")
    }

    pub fn items(mut self) -> Value {
        self.take("items")
    }

    pub fn data(mut self) -> Value {
        self.take("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_envelope_with_payload() {
        let envelope: Envelope = serde_json::from_value(json!({
            "status": 200,
            "item": {"id": "5be2c3022b9bb6000765d132"}
        }))
        .unwrap();

        assert!(envelope.is_ok());
        assert!(envelope.message.is_none());
        assert_eq!(envelope.item()["id"], "5be2c3022b9bb6000765d132");
    }

    #[test]
    fn test_decode_error_envelope() {
        let envelope: Envelope = serde_json::from_value(json!({
            "status": 404,
            "message": {"code": "mr000001", "message": "merchant not found"}
        }))
        .unwrap();

        assert!(!envelope.is_ok());
        let message = envelope.message.unwrap();
        assert_eq!(message.code, "mr000001");
        assert!(message.details.is_empty());
    }

    #[test]
    fn test_missing_projection_is_null() {
        let envelope = Envelope::ok();
        assert_eq!(envelope.items(), Value::Null);
    }

    #[test]
    fn test_serialize_flattens_payload() {
        let envelope = Envelope::ok().with_field("count", json!(3));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"status": 200, "count": 3}));
    }
}
