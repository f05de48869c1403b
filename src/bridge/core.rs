//! Public bridge handle.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use host_bridge::{Action, Bridge};
//! use serde_json::json;
//!
//! let bridge = Bridge::builder().transport(Arc::new(host)).build();
//!
//! // Wire the host's single callback to the bridge
//! let inbound = bridge.clone();
//! host.on_message(move |text| inbound.on_inbound_message(text));
//!
//! let reward = bridge
//!     .send_request(Action::ShowAd, json!({ "adType": "rewarded" }))
//!     .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::notify::{Notification, NotificationBus, Subscription};
use crate::protocol::BridgeResponse;
use crate::transport::{HostTransport, SharedTransport};

use super::builder::BridgeBuilder;
use super::config::BridgeConfig;
use super::state::{BridgeCommand, BridgeState, BridgeStats};

// ============================================================================
// Bridge
// ============================================================================

/// Handle to a running bridge.
///
/// Cheap to clone; every clone talks to the same task. The task stops
/// when [`shutdown`](Self::shutdown) is called or the last handle drops.
///
/// # Thread Safety
///
/// `Bridge` is `Send + Sync`. All methods are non-blocking.
#[derive(Clone)]
pub struct Bridge {
    /// Channel to the bridge task.
    command_tx: mpsc::UnboundedSender<BridgeCommand>,
    /// Transport slot (shared with the task).
    transport: SharedTransport,
    /// Listener registry (shared with the task).
    bus: NotificationBus,
}

impl Bridge {
    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Creates a bridge with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(transport: Arc<dyn HostTransport>) -> Self {
        Self::spawn(BridgeConfig::default(), SharedTransport::new(Some(transport)))
    }

    /// Spawns the bridge task.
    pub(crate) fn spawn(config: BridgeConfig, transport: SharedTransport) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let bus = NotificationBus::new();

        let state = BridgeState::new(&config, transport.clone(), bus.clone());
        tokio::spawn(state.run(command_rx));

        debug!(
            ad_rate_limit = config.ad_rate_limit,
            ad_rate_window_ms = config.ad_rate_window.as_millis() as u64,
            "Bridge started"
        );

        Self {
            command_tx,
            transport,
            bus,
        }
    }
}

// ============================================================================
// Bridge - Requests
// ============================================================================

impl Bridge {
    /// Issues a request.
    ///
    /// The request is submitted before this returns, so back-to-back calls
    /// are validated in call order. The returned [`Outcome`] settles exactly
    /// once: with the host's `SUCCESS` payload, or with an [`Error`].
    ///
    /// # Errors
    ///
    /// The outcome fails with:
    /// - [`Error::InvalidAction`], [`Error::DuplicateExclusiveRequest`],
    ///   [`Error::InvalidPayload`], [`Error::RateLimitExceeded`] on validation
    /// - [`Error::TransportUnavailable`] if no transport is usable now
    /// - [`Error::TransportSendFailed`] if the transport rejects the message
    /// - [`Error::RemoteFailure`] if the host answers with a failure status
    /// - [`Error::BridgeClosed`] if the bridge stops first
    pub fn send_request(&self, action: impl AsRef<str>, payload: Value) -> Outcome {
        let (responder, rx) = oneshot::channel();

        let command = BridgeCommand::Submit {
            action: action.as_ref().to_string(),
            payload,
            responder,
        };
        if self.command_tx.send(command).is_err() {
            debug!("Request submitted after bridge shutdown");
        }

        Outcome { rx }
    }

    /// Delivers text received from the host.
    ///
    /// This is the transport's single inbound callback.
    pub fn on_inbound_message(&self, raw: impl Into<String>) {
        let _ = self.command_tx.send(BridgeCommand::Inbound(raw.into()));
    }

    /// Signals that the host app regained focus.
    ///
    /// Resumes a queue paused by an unavailable transport.
    pub fn on_focus(&self) {
        let _ = self.command_tx.send(BridgeCommand::Focus);
    }

    /// Generates a fresh correlation identifier.
    #[inline]
    #[must_use]
    pub fn make_request_id() -> RequestId {
        RequestId::generate()
    }
}

// ============================================================================
// Bridge - Transport
// ============================================================================

impl Bridge {
    /// Returns `true` if a transport is attached and reports itself available.
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.transport.is_available()
    }

    /// Attaches or replaces the transport.
    ///
    /// Queued requests are not sent until the next [`on_focus`](Self::on_focus)
    /// or queue continuation.
    pub fn set_transport(&self, transport: Arc<dyn HostTransport>) {
        self.transport.set(transport);
    }

    /// Detaches the transport.
    pub fn clear_transport(&self) {
        self.transport.clear();
    }
}

// ============================================================================
// Bridge - Notifications
// ============================================================================

impl Bridge {
    /// Registers a notification listener.
    ///
    /// Listeners run on the bridge task; a panicking listener is logged
    /// and skipped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Streams notifications over a channel.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.bus.subscribe(move |notification| {
            let _ = tx.send(notification.clone());
        });
        (subscription, rx)
    }
}

// ============================================================================
// Bridge - Lifecycle
// ============================================================================

impl Bridge {
    /// Returns a snapshot of the bridge's bookkeeping.
    ///
    /// Reflects every command submitted through this handle before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BridgeClosed`] if the task has stopped.
    pub async fn stats(&self) -> Result<BridgeStats> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(BridgeCommand::Stats(tx))
            .map_err(|_| Error::BridgeClosed)?;
        rx.await.map_err(|_| Error::BridgeClosed)
    }

    /// Stops the task. Unsettled requests fail with [`Error::BridgeClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(BridgeCommand::Shutdown);
    }

    /// Returns `true` once the task has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("transport", &self.transport)
            .field("bus", &self.bus)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Eventual result of [`Bridge::send_request`].
///
/// Dropping it stops waiting but does not cancel the request.
#[derive(Debug)]
#[must_use = "an outcome does nothing unless awaited"]
pub struct Outcome {
    rx: oneshot::Receiver<Result<BridgeResponse>>,
}

impl Future for Outcome {
    type Output = Result<BridgeResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|settled| settled.unwrap_or(Err(Error::BridgeClosed)))
    }
}

// ============================================================================
// Tests
// ============================================================================
