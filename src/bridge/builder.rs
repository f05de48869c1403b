//! Builder pattern for bridge configuration.
//!
//! Provides a fluent API for configuring and creating [`Bridge`] instances.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use host_bridge::{Bridge, SlotRelease};
//!
//! let bridge = Bridge::builder()
//!     .transport(Arc::new(host))
//!     .ad_rate_limit(3, Duration::from_secs(30))
//!     .slot_release(SlotRelease::AgeOut)
//!     .build();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::{HostTransport, SharedTransport};

use super::config::{BridgeConfig, SlotRelease};
use super::core::Bridge;

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`] instance.
///
/// Use [`Bridge::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct BridgeBuilder {
    /// Host transport, if already known.
    transport: Option<Arc<dyn HostTransport>>,
    /// Tunables.
    config: BridgeConfig,
}

// ============================================================================
// BridgeBuilder Implementation
// ============================================================================

impl BridgeBuilder {
    /// Creates a new builder with default configuration and no transport.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host transport.
    ///
    /// A bridge built without one rejects every request with
    /// [`crate::Error::TransportUnavailable`] until
    /// [`Bridge::set_transport`] is called.
    #[inline]
    #[must_use]
    pub fn transport<T>(mut self, transport: Arc<T>) -> Self
    where
        T: HostTransport + 'static,
    {
        let transport: Arc<dyn HostTransport> = transport;
        self.transport = Some(transport);
        self
    }

    /// Sets an already type-erased host transport.
    #[inline]
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn HostTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replaces the whole configuration.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the ad-display ceiling and its window.
    ///
    /// # Arguments
    ///
    /// * `limit` - Admissions allowed inside one window
    /// * `window` - Sliding window length
    #[inline]
    #[must_use]
    pub fn ad_rate_limit(mut self, limit: usize, window: Duration) -> Self {
        self.config = self
            .config
            .with_ad_rate_limit(limit)
            .with_ad_rate_window(window);
        self
    }

    /// Sets the window slot release policy.
    #[inline]
    #[must_use]
    pub fn slot_release(mut self, policy: SlotRelease) -> Self {
        self.config = self.config.with_slot_release(policy);
        self
    }

    /// Spawns the bridge task and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn build(self) -> Bridge {
        Bridge::spawn(self.config, SharedTransport::new(self.transport))
    }
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("transport", &self.transport.is_some())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
