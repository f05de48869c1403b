//! Lifecycle notifications.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::error::ErrorInfo;
use crate::identifiers::RequestId;
use crate::protocol::{Action, AdType, HostEvent, InboundResponse};

// ============================================================================
// Notification
// ============================================================================

/// A lifecycle signal delivered to every listener.
///
/// Serializes as `{ "name": "<name>", "detail": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "detail")]
pub enum Notification {
    /// The transport became usable after a focus signal.
    #[serde(rename = "bridge:available")]
    BridgeAvailable,

    /// The transport is absent or reports itself unavailable.
    #[serde(rename = "bridge:unavailable")]
    BridgeUnavailable,

    /// A request failed validation.
    #[serde(rename = "request:rejected")]
    RequestRejected {
        /// Requested action name.
        action: String,
        /// Payload the caller supplied.
        payload: Value,
        /// Why it was rejected.
        error: ErrorInfo,
    },

    /// A request was handed to the transport.
    #[serde(rename = "request:sent", rename_all = "camelCase")]
    RequestSent {
        /// Request action.
        action: Action,
        /// Correlation identifier.
        request_id: RequestId,
        /// Request payload.
        payload: Value,
    },

    /// A request completed successfully.
    #[serde(rename = "request:success", rename_all = "camelCase")]
    RequestSuccess {
        /// Request action.
        action: Action,
        /// Correlation identifier.
        request_id: RequestId,
        /// Delivered payload.
        payload: Value,
    },

    /// A request failed (validation, transport or host).
    #[serde(rename = "request:error", rename_all = "camelCase")]
    RequestError {
        /// Requested action name.
        action: String,
        /// Correlation identifier, if one was assigned.
        request_id: Option<RequestId>,
        /// Failure code and message.
        error: ErrorInfo,
        /// Payload delivered with a host failure.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },

    /// A request reached a terminal answer. Emitted last.
    #[serde(rename = "request:completed", rename_all = "camelCase")]
    RequestCompleted {
        /// Request action.
        action: Action,
        /// Correlation identifier.
        request_id: RequestId,
        /// Terminal status reported by the host.
        status: String,
    },

    /// Raw inbound text, before decoding.
    #[serde(rename = "response:raw")]
    ResponseRaw {
        /// The text as delivered.
        raw: String,
    },

    /// Inbound text could not be decoded.
    #[serde(rename = "response:error")]
    ResponseParseError {
        /// Decoder message.
        message: String,
    },

    /// A response matched no outstanding request.
    #[serde(rename = "response:orphan")]
    ResponseOrphan {
        /// The unmatched response.
        response: InboundResponse,
    },

    /// A response matched an outstanding request.
    #[serde(rename = "response:received")]
    ResponseReceived {
        /// The matched response.
        response: InboundResponse,
    },

    /// The host pushed an event.
    #[serde(rename = "event:received")]
    EventReceived {
        /// The event as delivered.
        event: HostEvent,
    },

    /// Typed `AdAvailabilityChanged` event.
    #[serde(rename = "ad:availability", rename_all = "camelCase")]
    AdAvailabilityChanged {
        /// Ad unit kind.
        ad_type: AdType,
        /// Whether an ad can be shown now.
        available: bool,
    },
}

impl Notification {
    /// Returns the notification name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BridgeAvailable => "bridge:available",
            Self::BridgeUnavailable => "bridge:unavailable",
            Self::RequestRejected { .. } => "request:rejected",
            Self::RequestSent { .. } => "request:sent",
            Self::RequestSuccess { .. } => "request:success",
            Self::RequestError { .. } => "request:error",
            Self::RequestCompleted { .. } => "request:completed",
            Self::ResponseRaw { .. } => "response:raw",
            Self::ResponseParseError { .. } => "response:error",
            Self::ResponseOrphan { .. } => "response:orphan",
            Self::ResponseReceived { .. } => "response:received",
            Self::EventReceived { .. } => "event:received",
            Self::AdAvailabilityChanged { .. } => "ad:availability",
        }
    }

    /// Returns the request ID this notification concerns, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::RequestSent { request_id, .. }
            | Self::RequestSuccess { request_id, .. }
            | Self::RequestCompleted { request_id, .. } => Some(request_id),
            Self::RequestError { request_id, .. } => request_id.as_ref(),
            Self::ResponseOrphan { response } | Self::ResponseReceived { response } => {
                response.request_id.as_ref()
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
