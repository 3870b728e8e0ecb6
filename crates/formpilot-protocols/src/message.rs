//! Cross-context message protocol.
//!
//! FormPilot's execution contexts (page runtime, background coordinator,
//! configuration surface) exchange request/response messages with exactly
//! one reply per request. The envelope shape is `{"type": ..., "data": ...}`
//! and replies always carry a `status` flag. Unknown kinds get an explicit
//! error reply instead of a deserialization failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::secret::EncryptedSecret;

/// Error text replied for a message kind the dispatcher does not know.
pub const UNKNOWN_MESSAGE_TYPE: &str = "unknown message type";

/// Raw request envelope as received off the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl RequestEnvelope {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// A parsed request. Malformed payloads for a known kind fall through to
/// `Unknown` so the dispatcher still produces one well-formed error reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Encrypt { data: String },
    Decrypt { data: EncryptedSecret },
    AskLlm { label: String },
    StartPicker,
    StopPicker,
    Unknown(String),
}

impl Request {
    pub fn parse(envelope: RequestEnvelope) -> Self {
        match envelope.kind.as_str() {
            "encrypt" => match serde_json::from_value::<String>(envelope.data) {
                Ok(data) => Request::Encrypt { data },
                Err(_) => Request::Unknown("encrypt".to_string()),
            },
            "decrypt" => match serde_json::from_value::<EncryptedSecret>(envelope.data) {
                Ok(data) => Request::Decrypt { data },
                Err(_) => Request::Unknown("decrypt".to_string()),
            },
            "askLLM" => {
                // Payload is either a bare label string or `{"label": ...}`.
                let label = match &envelope.data {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(map) => map
                        .get("label")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                };
                match label {
                    Some(label) => Request::AskLlm { label },
                    None => Request::Unknown("askLLM".to_string()),
                }
            }
            "START_PICKER" => Request::StartPicker,
            "STOP_PICKER" => Request::StopPicker,
            other => Request::Unknown(other.to_string()),
        }
    }
}

/// Reply to a request. Exactly one is produced per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<EncryptedSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrypted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Bare acknowledgment, for commands with no payload.
    pub fn ack() -> Self {
        Self {
            status: true,
            ..Default::default()
        }
    }

    pub fn encrypted(secret: EncryptedSecret) -> Self {
        Self {
            status: true,
            encrypted: Some(secret),
            ..Default::default()
        }
    }

    pub fn decrypted(plaintext: impl Into<String>) -> Self {
        Self {
            status: true,
            decrypted: Some(plaintext.into()),
            ..Default::default()
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            status: true,
            response: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn unknown_type() -> Self {
        Self::error(UNKNOWN_MESSAGE_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_encrypt() {
        let envelope = RequestEnvelope::new("encrypt", json!("sk-secret"));
        assert_eq!(
            Request::parse(envelope),
            Request::Encrypt {
                data: "sk-secret".to_string()
            }
        );
    }

    #[test]
    fn test_parse_decrypt() {
        let envelope = RequestEnvelope::new("decrypt", json!({"data": [1, 2], "iv": [3, 4]}));
        assert_eq!(
            Request::parse(envelope),
            Request::Decrypt {
                data: EncryptedSecret {
                    data: vec![1, 2],
                    iv: vec![3, 4],
                }
            }
        );
    }

    #[test]
    fn test_parse_ask_llm_object() {
        let envelope = RequestEnvelope::new("askLLM", json!({"label": "Email"}));
        assert_eq!(
            Request::parse(envelope),
            Request::AskLlm {
                label: "Email".to_string()
            }
        );
    }

    #[test]
    fn test_parse_ask_llm_bare_string() {
        let envelope = RequestEnvelope::new("askLLM", json!("Email"));
        assert_eq!(
            Request::parse(envelope),
            Request::AskLlm {
                label: "Email".to_string()
            }
        );
    }

    #[test]
    fn test_parse_picker_commands() {
        let start = RequestEnvelope::new("START_PICKER", Value::Null);
        let stop = RequestEnvelope::new("STOP_PICKER", Value::Null);
        assert_eq!(Request::parse(start), Request::StartPicker);
        assert_eq!(Request::parse(stop), Request::StopPicker);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let envelope = RequestEnvelope::new("example", Value::Null);
        assert_eq!(Request::parse(envelope), Request::Unknown("example".to_string()));
    }

    #[test]
    fn test_parse_malformed_known_kind() {
        let envelope = RequestEnvelope::new("decrypt", json!("not a secret"));
        assert_eq!(Request::parse(envelope), Request::Unknown("decrypt".to_string()));
    }

    #[test]
    fn test_envelope_deserializes_without_data() {
        let envelope: RequestEnvelope = serde_json::from_str(r#"{"type":"START_PICKER"}"#).unwrap();
        assert_eq!(envelope.kind, "START_PICKER");
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_response_ack_shape() {
        let json = serde_json::to_string(&Response::ack()).unwrap();
        assert_eq!(json, r#"{"status":true}"#);
    }

    #[test]
    fn test_response_error_shape() {
        let json = serde_json::to_string(&Response::unknown_type()).unwrap();
        assert_eq!(json, r#"{"status":false,"error":"unknown message type"}"#);
    }

    #[test]
    fn test_response_answer_shape() {
        let response = Response::answer("jane@acme.com");
        assert!(response.status);
        assert_eq!(response.response.as_deref(), Some("jane@acme.com"));
        assert!(response.error.is_none());
    }
}
