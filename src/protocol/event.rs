//! Event message types.
//!
//! Events are unsolicited notifications pushed by the host. They are not
//! correlated with any request.
//!
//! # Event Types
//!
//! | Event | Payload |
//! |-------|---------|
//! | `AdAvailabilityChanged` | `{ "adType": "rewarded", "available": true }` |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AdType;

// ============================================================================
// Constants
// ============================================================================

/// Event name for ad availability changes.
pub const AD_AVAILABILITY_CHANGED: &str = "AdAvailabilityChanged";

// ============================================================================
// HostEvent
// ============================================================================

/// An event notification from the host.
///
/// # Format
///
/// ```json
/// {
///   "type": "EVENT",
///   "event": "AdAvailabilityChanged",
///   "payload": { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    /// Event name.
    pub event: String,

    /// Event-specific data.
    #[serde(default)]
    pub payload: Value,
}

impl HostEvent {
    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        match self.event.as_str() {
            AD_AVAILABILITY_CHANGED => {
                let ad_type = self
                    .payload
                    .get("adType")
                    .and_then(Value::as_str)
                    .and_then(AdType::parse);
                let available = self.payload.get("available").and_then(Value::as_bool);

                match (ad_type, available) {
                    (Some(ad_type), Some(available)) => {
                        ParsedEvent::AdAvailabilityChanged { ad_type, available }
                    }
                    _ => ParsedEvent::Unknown,
                }
            }
            _ => ParsedEvent::Unknown,
        }
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedEvent {
    /// An ad unit finished loading or was consumed.
    AdAvailabilityChanged {
        /// Ad unit kind.
        ad_type: AdType,
        /// Whether an ad of this kind can be shown now.
        available: bool,
    },

    /// Unrecognized event, or a recognized one with a malformed body.
    Unknown,
}

// ============================================================================
// Tests
// ============================================================================
