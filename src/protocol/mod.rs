//! Host protocol message types.
//!
//! This module defines the message format for communication between
//! the bridge and the host transport.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `REQUEST` | Bridge → Host | Action request |
//! | `RESPONSE` | Host → Bridge | Heartbeat or terminal answer |
//! | `EVENT` | Host → Bridge | Unsolicited notification |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `action` | Action registry and categorical values |
//! | `event` | Host event types |
//! | `message` | Request and response types |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// Submodules
// ============================================================================

/// Action registry.
pub mod action;

/// Host event types.
pub mod event;

/// Request and response message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::{Action, AdType, Category};
pub use event::{AD_AVAILABILITY_CHANGED, HostEvent, ParsedEvent};
pub use message::{
    BridgeResponse, InboundResponse, MessageKind, OutboundMessage, ResponseStatus, STATUS_PENDING,
    STATUS_SUCCESS,
};

// ============================================================================
// InboundMessage
// ============================================================================

/// A decoded message from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Answer to a request.
    Response(InboundResponse),
    /// Unsolicited event.
    Event(HostEvent),
    /// Well-formed JSON the bridge does not handle (other `type`, bad event body).
    Ignored,
}

impl InboundMessage {
    /// Decodes inbound text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the text is empty, is not JSON, or
    /// is a `RESPONSE` whose fields have the wrong types.
    pub fn decode(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        let kind = value
            .get("type")
            .cloned()
            .and_then(|t| serde_json::from_value::<MessageKind>(t).ok());

        match kind {
            Some(MessageKind::Response) => Ok(Self::Response(serde_json::from_value(value)?)),
            Some(MessageKind::Event) => Ok(serde_json::from_value(value)
                .map(Self::Event)
                .unwrap_or(Self::Ignored)),
            Some(MessageKind::Request) | None => Ok(Self::Ignored),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
