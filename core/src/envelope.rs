//! Response envelope decoding.
//!
//! Most endpoints answer with `{data, error, errors, meta}`. A handful of
//! older endpoints answer with a bare error object, a `{status: "success"}`
//! confirmation, or the result value itself. Each of those is a named
//! [`ResponseShape`] so the executor can handle them explicitly instead of
//! assuming one canonical form.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ErrorDetail;

/// The standard response wrapper.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorDetail>>,
    #[serde(default)]
    pub meta: Option<Value>,
}

impl Envelope {
    /// The primary error, falling back to the first entry of `errors`.
    pub fn first_error(&self) -> Option<&ErrorDetail> {
        self.error
            .as_ref()
            .or_else(|| self.errors.as_ref().and_then(|list| list.first()))
    }
}

/// Every body shape the service has been observed to return.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{data, error, errors, meta}`.
    Enveloped(Envelope),
    /// `{"status": "success", ...}` without a `data` member.
    StatusConfirmation { message: Option<String> },
    /// `{"errorCode", "message"}` or the older `{"error": "<code>", "message"}`.
    BareError(ErrorDetail),
    /// Any other JSON value, taken to be the payload itself.
    Bare(Value),
}

const ENVELOPE_KEYS: [&str; 4] = ["data", "error", "errors", "meta"];

impl ResponseShape {
    /// Classify a decoded JSON body.
    pub fn classify(value: Value) -> Self {
        let Value::Object(map) = value else {
            return ResponseShape::Bare(value);
        };

        if let Some(detail) = bare_error(&map) {
            return ResponseShape::BareError(detail);
        }

        if map.get("status").and_then(Value::as_str) == Some("success") && !map.contains_key("data") {
            let message = map.get("message").and_then(Value::as_str).map(str::to_owned);
            return ResponseShape::StatusConfirmation { message };
        }

        if ENVELOPE_KEYS.iter().any(|k| map.contains_key(*k)) {
            if let Ok(envelope) = serde_json::from_value::<Envelope>(Value::Object(map.clone())) {
                return ResponseShape::Enveloped(envelope);
            }
        }

        ResponseShape::Bare(Value::Object(map))
    }
}

fn bare_error(map: &Map<String, Value>) -> Option<ErrorDetail> {
    let message = map.get("message").and_then(Value::as_str)?;
    let code = map
        .get("errorCode")
        .and_then(Value::as_str)
        .or_else(|| map.get("error").and_then(Value::as_str))?;
    Some(ErrorDetail {
        error_code: code.to_owned(),
        message: message.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope() {
        let shape = ResponseShape::classify(json!({
            "data": {"notificationId": "n1"},
            "error": null,
            "errors": null,
            "meta": null
        }));
        let ResponseShape::Enveloped(env) = shape else {
            panic!("expected envelope, got {shape:?}");
        };
        assert_eq!(env.data, Some(json!({"notificationId": "n1"})));
        assert!(env.first_error().is_none());
    }

    #[test]
    fn error_envelope_prefers_error_over_errors() {
        let shape = ResponseShape::classify(json!({
            "data": null,
            "error": {"errorCode": "BAD_REQUEST", "message": "Bad request"},
            "errors": [{"errorCode": "NAME_TOO_SHORT", "message": "Name is too short"}],
            "meta": null
        }));
        let ResponseShape::Enveloped(env) = shape else {
            panic!("expected envelope");
        };
        assert_eq!(env.first_error().unwrap().error_code, "BAD_REQUEST");
    }

    #[test]
    fn errors_list_only() {
        let shape = ResponseShape::classify(json!({
            "data": null,
            "errors": [{"errorCode": "NAME_TOO_SHORT", "message": "Name is too short"}]
        }));
        let ResponseShape::Enveloped(env) = shape else {
            panic!("expected envelope");
        };
        assert_eq!(env.first_error().unwrap().error_code, "NAME_TOO_SHORT");
    }

    #[test]
    fn legacy_bare_error_object() {
        let shape = ResponseShape::classify(json!({"error": "Bad Request", "message": "Invalid URL"}));
        assert_eq!(
            shape,
            ResponseShape::BareError(ErrorDetail {
                error_code: "Bad Request".to_string(),
                message: "Invalid URL".to_string(),
            })
        );
    }

    #[test]
    fn bare_error_detail() {
        let shape = ResponseShape::classify(json!({"errorCode": "UNAUTHORISED", "message": "Invalid API Key"}));
        assert!(matches!(shape, ResponseShape::BareError(d) if d.error_code == "UNAUTHORISED"));
    }

    #[test]
    fn status_confirmation() {
        let shape = ResponseShape::classify(json!({"status": "success", "message": "deleted"}));
        assert_eq!(
            shape,
            ResponseShape::StatusConfirmation {
                message: Some("deleted".to_string())
            }
        );
    }

    #[test]
    fn status_with_data_is_an_envelope() {
        let shape = ResponseShape::classify(json!({"status": "success", "data": {"id": "u1"}}));
        assert!(matches!(shape, ResponseShape::Enveloped(_)));
    }

    #[test]
    fn legacy_list_is_bare() {
        let shape = ResponseShape::classify(json!([{"id": "t1"}]));
        assert_eq!(shape, ResponseShape::Bare(json!([{"id": "t1"}])));
    }

    #[test]
    fn envelope_with_malformed_error_is_bare() {
        let shape = ResponseShape::classify(json!({"error": {"unexpected": true}}));
        assert!(matches!(shape, ResponseShape::Bare(_)));
    }

    #[test]
    fn detail_object_is_bare() {
        let shape = ResponseShape::classify(json!({"detail": "Not found."}));
        assert!(matches!(shape, ResponseShape::Bare(_)));
    }
}
