//! Bridge configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use host_bridge::{BridgeConfig, SlotRelease};
//!
//! let config = BridgeConfig::new()
//!     .with_ad_rate_limit(3)
//!     .with_ad_rate_window(Duration::from_secs(30))
//!     .with_slot_release(SlotRelease::AgeOut);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Default number of ad-display admissions per window.
pub const DEFAULT_AD_RATE_LIMIT: usize = 2;

/// Default ad-display window.
pub const DEFAULT_AD_RATE_WINDOW: Duration = Duration::from_secs(10);

// ============================================================================
// SlotRelease
// ============================================================================

/// When a rate-limited request gives its window slot back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotRelease {
    /// On every terminal answer and on send failure.
    #[default]
    Immediate,
    /// Only if the host never saw the request (unsent or send failed);
    /// answered requests stay in the window until it expires them.
    AgeOut,
}

// ============================================================================
// BridgeConfig
// ============================================================================

/// Tunables for a [`crate::Bridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum ad-display admissions inside the window.
    pub ad_rate_limit: usize,

    /// Sliding window length.
    pub ad_rate_window: Duration,

    /// Slot release policy.
    pub slot_release: SlotRelease,
}

// ============================================================================
// Constructors
// ============================================================================

impl BridgeConfig {
    /// Creates a config with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ad_rate_limit: DEFAULT_AD_RATE_LIMIT,
            ad_rate_window: DEFAULT_AD_RATE_WINDOW,
            slot_release: SlotRelease::Immediate,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BridgeConfig {
    /// Sets the ad-display admission ceiling.
    #[inline]
    #[must_use]
    pub const fn with_ad_rate_limit(mut self, limit: usize) -> Self {
        self.ad_rate_limit = limit;
        self
    }

    /// Sets the ad-display window length.
    #[inline]
    #[must_use]
    pub const fn with_ad_rate_window(mut self, window: Duration) -> Self {
        self.ad_rate_window = window;
        self
    }

    /// Sets the slot release policy.
    #[inline]
    #[must_use]
    pub const fn with_slot_release(mut self, policy: SlotRelease) -> Self {
        self.slot_release = policy;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
