//! Notification bus.
//!
//! The bridge reports every lifecycle step (send, heartbeat, terminal
//! answer, parse failure, host event) as a [`Notification`]. Observers
//! subscribe to the [`NotificationBus`]; their failures never reach the
//! dispatch logic.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `bus` | Listener registry and fault-isolated fan-out |
//! | `notification` | Notification variants |

// ============================================================================
// Submodules
// ============================================================================

/// Listener registry and fan-out.
pub mod bus;

/// Notification variants.
pub mod notification;

// ============================================================================
// Re-exports
// ============================================================================

pub use bus::{Listener, NotificationBus, Subscription};
pub use notification::Notification;
