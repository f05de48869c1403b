//! Host Bridge - request/response bridge to a native host app.
//!
//! An embedded client talks to its host (ads, in-app purchases, SDK
//! setup) through a transport that accepts one string and answers through
//! a single callback. This library turns that into awaitable requests.
//!
//! # Architecture
//!
//! - **Client (Rust)**: Validates, queues and correlates requests
//! - **Host (native)**: Executes actions, answers with `RESPONSE` messages,
//!   pushes `EVENT` messages
//!
//! Key design principles:
//!
//! - One request in flight at a time, others wait in FIFO order
//! - Exclusive actions (`Init`, `Purchase`, `RestorePurchases`) never overlap
//! - Ad display is rate limited over a sliding window
//! - `PENDING` answers are heartbeats; only terminal answers settle a request
//! - Observers get every lifecycle step as a [`Notification`]
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use host_bridge::{Action, Bridge, Result};
//! use serde_json::json;
//!
//! async fn show_reward(host: Arc<MyHost>) -> Result<()> {
//!     let bridge = Bridge::builder().transport(host.clone()).build();
//!
//!     let inbound = bridge.clone();
//!     host.on_message(move |text| inbound.on_inbound_message(text));
//!
//!     bridge.send_request(Action::Init, json!({})).await?;
//!     let reward = bridge
//!         .send_request(Action::ShowAd, json!({ "adType": "rewarded" }))
//!         .await?;
//!     println!("Rewarded: {}", reward.get_bool("rewarded"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Bridge handle, queue, correlation and admission |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`notify`] | Notification bus |
//! | [`protocol`] | Wire message types |
//! | [`transport`] | Host transport abstraction |

// ============================================================================
// Modules
// ============================================================================

/// Bridge engine.
///
/// Use [`Bridge::builder()`] to create a configured bridge.
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Notification bus for observers.
pub mod notify;

/// Host protocol message types.
pub mod protocol;

/// Host transport abstraction.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{Bridge, BridgeBuilder, BridgeConfig, BridgeStats, Outcome, SlotRelease};

// Error types
pub use error::{Error, ErrorInfo, Result};

// Identifier types
pub use identifiers::{RequestId, SubscriptionId};

// Notification types
pub use notify::{Notification, NotificationBus, Subscription};

// Protocol types
pub use protocol::{Action, AdType, BridgeResponse};

// Transport types
pub use transport::{ChannelTransport, HostTransport, SharedTransport, TransportError};
