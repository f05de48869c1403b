//! Host transport layer.
//!
//! The transport is an external collaborator: it accepts one serialized
//! string and later delivers answers through a single callback. The bridge
//! only ever talks to it through [`HostTransport`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Bridge task    │     post_message(json)       │  Host           │
//! │                 │─────────────────────────────►│  (native side)  │
//! │  SharedTransport│                              │                 │
//! │                 │◄─────────────────────────────│                 │
//! └─────────────────┘  Bridge::on_inbound_message  └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | mpsc-backed transport |
//! | `host` | Transport trait, error and shared slot |

// ============================================================================
// Submodules
// ============================================================================

/// mpsc-backed transport.
pub mod channel;

/// Transport trait and shared slot.
pub mod host;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::ChannelTransport;
pub use host::{HostTransport, SharedTransport, TransportError};
