//! Channel-backed transport.
//!
//! Forwards every posted message into a tokio mpsc channel. Useful when
//! the host side lives in the same process (an embedder's IPC pump, a
//! simulator, tests).

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::trace;

use super::{HostTransport, TransportError};

// ============================================================================
// ChannelTransport
// ============================================================================

/// Transport that pushes messages onto an unbounded channel.
///
/// Availability can be toggled to simulate the host going away.
#[derive(Debug)]
pub struct ChannelTransport {
    /// Outgoing message sink.
    tx: mpsc::UnboundedSender<String>,
    /// Capability flag.
    available: AtomicBool,
}

impl ChannelTransport {
    /// Creates a transport and the receiver the host reads from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                available: AtomicBool::new(true),
            },
            rx,
        )
    }

    /// Marks the host as available or not.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl HostTransport for ChannelTransport {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst) && !self.tx.is_closed()
    }

    fn post_message(&self, message: &str) -> Result<(), TransportError> {
        trace!(len = message.len(), "Posting message to host channel");
        self.tx
            .send(message.to_string())
            .map_err(|_| TransportError::with_code("CHANNEL_CLOSED", "host channel closed"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_messages() {
        let (transport, mut rx) = ChannelTransport::new();
        assert!(transport.is_available());

        transport.post_message("hello").expect("post");
        assert_eq!(rx.try_recv().ok().as_deref(), Some("hello"));
    }

    #[test]
    fn test_closed_receiver() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);

        assert!(!transport.is_available());
        let err = transport.post_message("x").unwrap_err();
        assert_eq!(err.code.as_deref(), Some("CHANNEL_CLOSED"));
    }

    #[test]
    fn test_toggle_availability() {
        let (transport, _rx) = ChannelTransport::new();
        transport.set_available(false);
        assert!(!transport.is_available());
        transport.set_available(true);
        assert!(transport.is_available());
    }
}
