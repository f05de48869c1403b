//! Error types for the host bridge.
//!
//! Every caller-facing failure, whether detected locally during validation
//! or reported by the host, is delivered through the same [`Error`] type.
//! Callers distinguish failures by [`Error::code`], never by structure.
//!
//! # Usage
//!
//! ```ignore
//! use host_bridge::{Action, Error};
//!
//! match bridge.send_request(Action::Purchase, payload).await {
//!     Ok(response) => println!("bought: {}", response.payload),
//!     Err(err) if err.code() == "USER_CANCELLED" => {}
//!     Err(err) => eprintln!("{}: {}", err.code(), err),
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Validation | [`Error::InvalidAction`], [`Error::DuplicateExclusiveRequest`], [`Error::InvalidPayload`], [`Error::RateLimitExceeded`] |
//! | Transport | [`Error::TransportUnavailable`], [`Error::TransportSendFailed`] |
//! | Remote | [`Error::RemoteFailure`] |
//! | Lifecycle | [`Error::BridgeClosed`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::identifiers::RequestId;
use crate::protocol::Action;

// ============================================================================
// Constants
// ============================================================================

/// Code used when the host reports a failure without a code.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN";

/// Code used when the transport rejects a message without a code.
pub const POST_MESSAGE_FAILED_CODE: &str = "POST_MESSAGE_FAILED";

/// Message used when the host reports a failure without a message.
const DEFAULT_REMOTE_MESSAGE: &str = "Request failed on host";

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Action name is not in the registry.
    #[error("Unsupported action: {action}")]
    InvalidAction {
        /// The rejected action name.
        action: String,
    },

    /// An exclusive action already has an instance queued or in flight.
    #[error("A {action} request is already in progress")]
    DuplicateExclusiveRequest {
        /// The exclusive action.
        action: Action,
    },

    /// Payload is missing a required field or carries an invalid value.
    #[error("Invalid payload for {action}: {message}")]
    InvalidPayload {
        /// The action whose payload was rejected.
        action: Action,
        /// Which field failed and why.
        message: String,
    },

    /// Too many ad-display requests inside the sliding window.
    #[error("Ad request limit exceeded ({limit} per {window_ms}ms)")]
    RateLimitExceeded {
        /// The rate-limited action.
        action: Action,
        /// Maximum admissions per window.
        limit: usize,
        /// Window length in milliseconds.
        window_ms: u64,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// No usable host transport.
    #[error("Host bridge is only available inside the app")]
    TransportUnavailable {
        /// The action that could not be queued.
        action: Action,
    },

    /// The transport rejected the serialized message.
    #[error("Failed to post message: {message}")]
    TransportSendFailed {
        /// The request that failed to send.
        request_id: RequestId,
        /// The request's action.
        action: Action,
        /// Transport-supplied code.
        code: String,
        /// Transport-supplied message.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// The host answered with a non-success terminal status.
    #[error("{message}")]
    RemoteFailure {
        /// The answered request.
        request_id: RequestId,
        /// The request's action.
        action: Action,
        /// Terminal status reported by the host.
        status: String,
        /// Host-supplied error code, or [`UNKNOWN_ERROR_CODE`].
        code: String,
        /// Host-supplied error message.
        message: String,
        /// Payload delivered with the failure (empty object if absent).
        payload: Value,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The bridge task stopped before the request settled.
    #[error("Bridge closed")]
    BridgeClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid action error.
    #[inline]
    pub fn invalid_action(action: impl Into<String>) -> Self {
        Self::InvalidAction {
            action: action.into(),
        }
    }

    /// Creates a duplicate exclusive request error.
    #[inline]
    pub fn duplicate_request(action: Action) -> Self {
        Self::DuplicateExclusiveRequest { action }
    }

    /// Creates an invalid payload error.
    #[inline]
    pub fn invalid_payload(action: Action, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            action,
            message: message.into(),
        }
    }

    /// Creates a rate limit exceeded error.
    #[inline]
    pub fn rate_limit_exceeded(action: Action, limit: usize, window_ms: u64) -> Self {
        Self::RateLimitExceeded {
            action,
            limit,
            window_ms,
        }
    }

    /// Creates a transport unavailable error.
    #[inline]
    pub fn transport_unavailable(action: Action) -> Self {
        Self::TransportUnavailable { action }
    }

    /// Creates a transport send failure.
    ///
    /// Falls back to [`POST_MESSAGE_FAILED_CODE`] when `code` is `None`.
    #[inline]
    pub fn send_failed(
        request_id: RequestId,
        action: Action,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::TransportSendFailed {
            request_id,
            action,
            code: code.unwrap_or_else(|| POST_MESSAGE_FAILED_CODE.to_string()),
            message: message.into(),
        }
    }

    /// Creates a remote failure from host-supplied fields.
    ///
    /// Missing or empty code and message fall back to defaults.
    pub fn remote(
        request_id: RequestId,
        action: Action,
        status: impl Into<String>,
        code: Option<String>,
        message: Option<String>,
        payload: Value,
    ) -> Self {
        Self::RemoteFailure {
            request_id,
            action,
            status: status.into(),
            code: code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_REMOTE_MESSAGE.to_string()),
            payload,
        }
    }
}

// ============================================================================
// Structured Accessors
// ============================================================================

impl Error {
    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidAction { .. } => "INVALID_ACTION",
            Self::DuplicateExclusiveRequest { .. } => "DUPLICATE_REQUEST",
            Self::InvalidPayload { .. } => "INVALID_PAYLOAD",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::TransportUnavailable { .. } => "BRIDGE_UNAVAILABLE",
            Self::TransportSendFailed { code, .. } => code.as_str(),
            Self::RemoteFailure { code, .. } => code.as_str(),
            Self::BridgeClosed => "BRIDGE_CLOSED",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the request ID, if the request got far enough to have one.
    #[must_use]
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::TransportSendFailed { request_id, .. }
            | Self::RemoteFailure { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Returns the action name the failed call was issued with.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::InvalidAction { action } => Some(action.as_str()),
            Self::DuplicateExclusiveRequest { action }
            | Self::InvalidPayload { action, .. }
            | Self::RateLimitExceeded { action, .. }
            | Self::TransportUnavailable { action }
            | Self::TransportSendFailed { action, .. }
            | Self::RemoteFailure { action, .. } => Some(action.as_str()),
            Self::BridgeClosed | Self::Json(_) => None,
        }
    }

    /// Returns the payload the host delivered with a failure.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::RemoteFailure { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Returns the `{ code, message }` pair used in notifications.
    #[must_use]
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code().to_string(),
            message: match self {
                Self::TransportSendFailed { message, .. }
                | Self::RemoteFailure { message, .. } => message.clone(),
                other => other.to_string(),
            },
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the request was rejected before reaching the transport.
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAction { .. }
                | Self::DuplicateExclusiveRequest { .. }
                | Self::InvalidPayload { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::TransportUnavailable { .. } | Self::TransportSendFailed { .. }
        )
    }

    /// Returns `true` if the host answered with a failure.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteFailure { .. })
    }
}

// ============================================================================
// ErrorInfo
// ============================================================================

/// Serializable `{ code, message }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_action("Teleport");
        assert_eq!(err.to_string(), "Unsupported action: Teleport");
        assert_eq!(err.code(), "INVALID_ACTION");
        assert_eq!(err.action(), Some("Teleport"));
    }

    #[test]
    fn test_remote_defaults() {
        let err = Error::remote(
            RequestId::from("r1"),
            Action::Purchase,
            "FAILED",
            None,
            Some(String::new()),
            json!({}),
        );

        assert_eq!(err.code(), UNKNOWN_ERROR_CODE);
        assert_eq!(err.to_string(), DEFAULT_REMOTE_MESSAGE);
        assert_eq!(err.request_id().map(RequestId::as_str), Some("r1"));
        assert_eq!(err.action(), Some("Purchase"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_remote_host_code() {
        let err = Error::remote(
            RequestId::from("r2"),
            Action::ShowAd,
            "ERROR",
            Some("NO_FILL".into()),
            Some("No ad available".into()),
            json!({ "adType": "rewarded" }),
        );

        assert_eq!(err.code(), "NO_FILL");
        assert_eq!(
            err.info(),
            ErrorInfo {
                code: "NO_FILL".into(),
                message: "No ad available".into(),
            }
        );
        assert_eq!(err.payload(), Some(&json!({ "adType": "rewarded" })));
    }

    #[test]
    fn test_send_failed_default_code() {
        let err = Error::send_failed(RequestId::from("r3"), Action::Init, None, "boom");
        assert_eq!(err.code(), POST_MESSAGE_FAILED_CODE);
        assert_eq!(err.info().message, "boom");
        assert!(err.is_transport_error());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::duplicate_request(Action::Init).is_validation_error());
        assert!(Error::rate_limit_exceeded(Action::ShowAd, 2, 10_000).is_validation_error());
        assert!(Error::invalid_payload(Action::Purchase, "productId is required").is_validation_error());
        assert!(!Error::BridgeClosed.is_validation_error());
        assert!(!Error::transport_unavailable(Action::Init).is_validation_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.code(), "JSON_ERROR");
        assert_eq!(err.action(), None);
    }
}
