//! Host transport trait and shared slot.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

// ============================================================================
// HostTransport
// ============================================================================

/// The host's message channel.
///
/// Accepts one serialized message at a time. Answers come back later
/// through [`crate::Bridge::on_inbound_message`].
///
/// Implementations are called from the bridge task and must not block.
pub trait HostTransport: Send + Sync {
    /// Returns `true` if the host can currently accept messages.
    fn is_available(&self) -> bool;

    /// Hands one serialized message to the host.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the host rejected the message.
    fn post_message(&self, message: &str) -> Result<(), TransportError>;
}

// ============================================================================
// TransportError
// ============================================================================

/// Synchronous failure raised by [`HostTransport::post_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// Optional host-specific code.
    pub code: Option<String>,
    /// Description of the failure.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error without a code.
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Creates a transport error with a code.
    #[inline]
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

// ============================================================================
// SharedTransport
// ============================================================================

/// Replaceable transport slot shared by the bridge handle and its task.
///
/// An empty slot is a normal state: the host object has not been
/// injected yet.
#[derive(Clone, Default)]
pub struct SharedTransport {
    inner: Arc<RwLock<Option<Arc<dyn HostTransport>>>>,
}

impl SharedTransport {
    /// Creates a slot holding `transport`.
    #[must_use]
    pub fn new(transport: Option<Arc<dyn HostTransport>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(transport)),
        }
    }

    /// Replaces the transport.
    pub fn set(&self, transport: Arc<dyn HostTransport>) {
        *self.inner.write() = Some(transport);
    }

    /// Empties the slot.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    /// Returns the transport if present and available.
    #[must_use]
    pub fn usable(&self) -> Option<Arc<dyn HostTransport>> {
        self.inner
            .read()
            .as_ref()
            .filter(|t| t.is_available())
            .map(Arc::clone)
    }

    /// Returns `true` if a transport is present and available.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.usable().is_some()
    }
}

impl fmt::Debug for SharedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTransport")
            .field("present", &self.inner.read().is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
