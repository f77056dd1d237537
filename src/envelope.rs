//! The JSON envelope wrapped around every Vicohome API response.
//!
//! Every response carries a numeric status, a message and a payload. The
//! account and device endpoints name the status `result`, the event library
//! endpoints name it `code`. Both are decoded into one `i64` status, but the
//! field that is consulted is always chosen by the endpoint.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use strum::{Display, EnumString};
use thiserror::Error;

/// Status code that means success.
pub const STATUS_SUCCESS: i64 = 0;
/// The session was invalidated by a login elsewhere.
pub const ERROR_ACCOUNT_KICKED: i64 = -1024;
/// The request carried no usable token.
pub const ERROR_TOKEN_MISSING: i64 = -1025;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("error unmarshaling response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("error unmarshaling response: expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("invalid status field '{field}': {value}")]
    InvalidStatus { field: StatusField, value: String },
}

/// Name of the status field used by an endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatusField {
    Result,
    Code,
}

/// Tolerantly decoded response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub msg: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Decode a response body. Only a JSON object is an envelope.
    pub fn parse(body: &[u8]) -> Result<Envelope, EnvelopeError> {
        let value: Value = serde_json::from_slice(body)?;
        let kind = match &value {
            Value::Object(_) => return Ok(serde_json::from_value(value)?),
            Value::Array(_) => "an array",
            Value::String(_) => "a string",
            Value::Number(_) => "a number",
            Value::Bool(_) => "a boolean",
            Value::Null => "null",
        };
        Err(EnvelopeError::NotAnObject(kind))
    }

    /// Decode the status for the given field.
    ///
    /// Integral numbers and strings holding a decimal integer are accepted;
    /// an absent or `null` field yields `None`. Anything else is rejected.
    pub fn status(&self, field: StatusField) -> Result<Option<i64>, EnvelopeError> {
        let raw = match field {
            StatusField::Result => self.result.as_ref(),
            StatusField::Code => self.code.as_ref(),
        };

        let invalid = |value: &Value| EnvelopeError::InvalidStatus {
            field,
            value: value.to_string(),
        };

        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(value @ Value::Number(number)) => {
                if let Some(status) = number.as_i64() {
                    Ok(Some(status))
                } else {
                    match number.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                            Ok(Some(f as i64))
                        }
                        _ => Err(invalid(value)),
                    }
                }
            }
            Some(value @ Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| invalid(value)),
            Some(value) => Err(invalid(value)),
        }
    }

    /// The payload when it is a JSON object.
    pub fn data_object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.as_ref().and_then(Value::as_object)
    }
}

/// Deserializers that never fail: mistyped values become the zero value.
pub mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            _ => 0,
        })
    }

    pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            _ => 0.0,
        })
    }

    /// Keep only the object entries of an array; anything else is empty.
    pub fn objects<'de, D>(deserializer: D) -> Result<Vec<serde_json::Map<String, Value>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_field_numeric() {
        let envelope = Envelope::parse(br#"{"result":-1025,"msg":"token missing","data":null}"#).unwrap();
        assert_eq!(envelope.status(StatusField::Result).unwrap(), Some(-1025));
        assert_eq!(envelope.status(StatusField::Code).unwrap(), None);
        assert_eq!(envelope.msg, "token missing");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_code_field_as_string() {
        let envelope = Envelope::parse(br#"{"code":"0","msg":"success","data":{}}"#).unwrap();
        assert_eq!(envelope.status(StatusField::Code).unwrap(), Some(0));
    }

    #[test]
    fn test_non_object_bodies_are_rejected() {
        for body in [&b"[]"[..], &b"[-1025]"[..], &b"\"ok\""[..], &b"0"[..], &b"null"[..]] {
            assert!(matches!(
                Envelope::parse(body),
                Err(EnvelopeError::NotAnObject(_))
            ));
        }
    }

    #[test]
    fn test_float_status_is_accepted_when_integral() {
        let envelope = Envelope::parse(br#"{"result":-2000.0}"#).unwrap();
        assert_eq!(envelope.status(StatusField::Result).unwrap(), Some(-2000));
    }

    #[test]
    fn test_invalid_status_shapes() {
        for body in [
            &br#"{"result":"zero"}"#[..],
            &br#"{"result":true}"#[..],
            &br#"{"result":1.5}"#[..],
            &br#"{"result":{"x":1}}"#[..],
        ] {
            let envelope = Envelope::parse(body).unwrap();
            assert!(matches!(
                envelope.status(StatusField::Result),
                Err(EnvelopeError::InvalidStatus { .. })
            ));
        }
    }

    #[test]
    fn test_mistyped_message_defaults_to_empty() {
        let envelope = Envelope::parse(br#"{"result":0,"msg":42}"#).unwrap();
        assert_eq!(envelope.msg, "");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Envelope::parse(b"<html>"), Err(EnvelopeError::Json(_))));
    }

    #[test]
    fn test_status_field_names() {
        assert_eq!(StatusField::Result.to_string(), "result");
        assert_eq!("code".parse::<StatusField>().unwrap(), StatusField::Code);
    }
}
