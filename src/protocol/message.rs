//! Request and Response message types.
//!
//! Defines the serialized format exchanged with the host transport.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::RequestId;

use super::Action;

// ============================================================================
// Constants
// ============================================================================

/// Heartbeat status: the host is still working on the request.
pub const STATUS_PENDING: &str = "PENDING";

/// Successful terminal status.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Label used when a response carries no status at all.
const STATUS_MISSING: &str = "UNKNOWN";

// ============================================================================
// MessageKind
// ============================================================================

/// Message type discriminator (`type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    /// Outbound request.
    Request,
    /// Answer to a request.
    Response,
    /// Unsolicited host notification.
    Event,
}

// ============================================================================
// OutboundMessage
// ============================================================================

/// A request from the bridge to the host.
///
/// # Format
///
/// ```json
/// {
///   "type": "REQUEST",
///   "action": "ShowAd",
///   "requestId": "uuid",
///   "payload": { "adType": "rewarded" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// Always [`MessageKind::Request`].
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Requested action.
    pub action: Action,

    /// Correlation identifier.
    #[serde(rename = "requestId")]
    pub request_id: RequestId,

    /// Caller-supplied payload.
    pub payload: Value,
}

impl OutboundMessage {
    /// Creates a new request message.
    #[inline]
    #[must_use]
    pub fn new(action: Action, request_id: RequestId, payload: Value) -> Self {
        Self {
            kind: MessageKind::Request,
            action,
            request_id,
            payload,
        }
    }

    /// Serializes the message to JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the payload cannot be serialized.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// InboundResponse
// ============================================================================

/// An answer from the host to a request.
///
/// # Format
///
/// ```json
/// {
///   "type": "RESPONSE",
///   "requestId": "uuid",
///   "status": "PENDING" | "SUCCESS" | "<failure>",
///   "payload": { ... },
///   "error": { "code": "...", "message": "..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundResponse {
    /// Matches the request's `requestId`.
    #[serde(default)]
    pub request_id: Option<RequestId>,

    /// Raw status string.
    #[serde(default)]
    pub status: Option<String>,

    /// Result or failure payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Failure details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl InboundResponse {
    /// Classifies the status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        ResponseStatus::classify(self.status.as_deref())
    }

    /// Returns the raw status, or `UNKNOWN` if the host sent none.
    #[inline]
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(STATUS_MISSING)
    }

    /// Returns the payload, defaulting to an empty object.
    #[must_use]
    pub fn payload_or_empty(&self) -> Value {
        self.payload
            .clone()
            .filter(|p| !p.is_null())
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Returns `error.code` if it is a string.
    #[inline]
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        self.error_field("code")
    }

    /// Returns `error.message` if it is a string.
    #[inline]
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error_field("message")
    }

    fn error_field(&self, key: &str) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

// ============================================================================
// ResponseStatus
// ============================================================================

/// Classified response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Heartbeat; the request stays outstanding.
    Pending,
    /// Terminal success.
    Success,
    /// Any other terminal status, including a missing one.
    Failure,
}

impl ResponseStatus {
    /// Classifies a raw status string.
    #[must_use]
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some(STATUS_PENDING) => Self::Pending,
            Some(STATUS_SUCCESS) => Self::Success,
            _ => Self::Failure,
        }
    }

    /// Returns `true` if this status ends the request's lifecycle.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ============================================================================
// BridgeResponse
// ============================================================================

/// Successful outcome delivered to a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    /// Correlation identifier of the request.
    pub request_id: RequestId,
    /// The request's action.
    pub action: Action,
    /// Terminal status (always `SUCCESS`).
    pub status: String,
    /// Delivered payload (empty object if absent).
    pub payload: Value,
}

impl BridgeResponse {
    /// Gets a string value from the payload.
    ///
    /// Returns empty string if key not found or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.payload
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Gets a boolean value from the payload.
    ///
    /// Returns false if key not found or not a boolean.
    #[inline]
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.payload
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_outbound_serialization() {
        let message = OutboundMessage::new(
            Action::ShowAd,
            RequestId::from("abc"),
            json!({ "adType": "banner" }),
        );
        let value: Value = serde_json::from_str(&message.to_json().expect("serialize"))
            .expect("valid json");

        assert_eq!(
            value,
            json!({
                "type": "REQUEST",
                "action": "ShowAd",
                "requestId": "abc",
                "payload": { "adType": "banner" }
            })
        );
    }

    #[test]
    fn test_response_success() {
        let json_str = r#"{
            "type": "RESPONSE",
            "requestId": "550e8400-e29b-41d4-a716-446655440000",
            "status": "SUCCESS",
            "payload": {"rewarded": true}
        }"#;

        let response: InboundResponse = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.status(), ResponseStatus::Success);
        assert_eq!(response.payload_or_empty(), json!({ "rewarded": true }));
        assert!(response.status().is_terminal());
    }

    #[test]
    fn test_response_pending() {
        let response: InboundResponse =
            serde_json::from_str(r#"{"requestId":"r","status":"PENDING"}"#).expect("parse");
        assert_eq!(response.status(), ResponseStatus::Pending);
        assert!(!response.status().is_terminal());
    }

    #[test]
    fn test_response_error_fields() {
        let json_str = r#"{
            "requestId": "r",
            "status": "ERROR",
            "error": {"code": "NO_FILL", "message": "No ad"}
        }"#;

        let response: InboundResponse = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.status(), ResponseStatus::Failure);
        assert_eq!(response.error_code().as_deref(), Some("NO_FILL"));
        assert_eq!(response.error_message().as_deref(), Some("No ad"));
        assert_eq!(response.payload_or_empty(), json!({}));
    }

    #[test]
    fn test_response_missing_fields() {
        let response: InboundResponse = serde_json::from_str("{}").expect("parse");
        assert!(response.request_id.is_none());
        assert_eq!(response.status(), ResponseStatus::Failure);
        assert_eq!(response.status_label(), "UNKNOWN");
        assert_eq!(response.error_code(), None);
    }

    #[test]
    fn test_response_malformed_error_field() {
        let response: InboundResponse =
            serde_json::from_str(r#"{"requestId":"r","status":"FAILED","error":"oops"}"#)
                .expect("parse");
        assert_eq!(response.error_code(), None);
        assert_eq!(response.error_message(), None);
    }

    #[test]
    fn test_bridge_response_helpers() {
        let response = BridgeResponse {
            request_id: RequestId::from("r"),
            action: Action::CheckProduct,
            status: STATUS_SUCCESS.into(),
            payload: json!({ "price": "0.99 USD", "owned": true }),
        };
        assert_eq!(response.get_string("price"), "0.99 USD");
        assert!(response.get_bool("owned"));
        assert_eq!(response.get_string("missing"), "");
        assert!(!response.get_bool("missing"));
    }
}
