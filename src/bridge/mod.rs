//! Request bridge engine.
//!
//! A single spawned task owns all bookkeeping. [`Bridge`] handles talk to
//! it over a command channel; each caller gets its result back through an
//! [`Outcome`].
//!
//! # Request Lifecycle
//!
//! ```text
//! send_request ─► validate ─► queue ─► active slot ─► post_message
//!                    │                                    │
//!                    ▼                                    ▼
//!               rejected                PENDING* ─► SUCCESS / failure
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent construction |
//! | `config` | Rate window and release policy |
//! | `core` | Public handle and [`Outcome`] |
//! | `correlator` | Response and event demultiplexing |
//! | `dispatch` | Single-flight queue |
//! | `exclusivity` | In-flight counters for exclusive actions |
//! | `rate_limit` | Sliding-window admission |
//! | `state` | Task state and command loop |
//! | `validator` | Admission checks |

// ============================================================================
// Submodules
// ============================================================================

/// Bridge builder.
pub mod builder;

/// Bridge configuration.
pub mod config;

/// Public bridge handle.
pub mod core;

/// Response and event demultiplexing.
mod correlator;

/// Dispatch queue.
mod dispatch;

/// Exclusive action tracking.
pub mod exclusivity;

/// Sliding-window rate limiter.
pub mod rate_limit;

/// Task state and command loop.
mod state;

/// Request admission.
pub mod validator;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BridgeBuilder;
pub use config::{BridgeConfig, DEFAULT_AD_RATE_LIMIT, DEFAULT_AD_RATE_WINDOW, SlotRelease};
pub use core::{Bridge, Outcome};
pub use exclusivity::ExclusivityTracker;
pub use rate_limit::{RateLimiter, Reservation};
pub use state::BridgeStats;
pub use validator::{Admission, RequestValidator};
