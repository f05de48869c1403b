//! Bridge task state and command loop.
//!
//! One task owns every mutable container: the dispatch queue, the
//! outstanding map, the active slot, the exclusivity counters and the
//! rate window. Commands are handled one at a time to completion, so none
//! of it needs locking.
//!
//! Queue continuation after a terminal answer or a send failure is
//! deferred until the current handler has returned.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::notify::{Notification, NotificationBus};
use crate::protocol::{Action, BridgeResponse};
use crate::transport::SharedTransport;

use super::config::BridgeConfig;
use super::rate_limit::Reservation;
use super::validator::RequestValidator;

// ============================================================================
// Types
// ============================================================================

/// Settles one caller's outcome. Consumed on use, so a request settles once.
pub(crate) type Responder = oneshot::Sender<Result<BridgeResponse>>;

/// Fails a caller whose request never got a correlation ID.
pub(crate) fn reject(responder: Responder, err: Error) {
    if let Err(Err(err)) = responder.send(Err(err)) {
        debug!(
            action = err.action().unwrap_or_default(),
            code = err.code(),
            "Caller stopped waiting"
        );
    }
}

// ============================================================================
// BridgeCommand
// ============================================================================

/// Internal commands for the bridge task.
pub(crate) enum BridgeCommand {
    /// Validate and queue a request.
    Submit {
        action: String,
        payload: Value,
        responder: Responder,
    },
    /// Raw text delivered by the host.
    Inbound(String),
    /// Host regained focus; re-check the transport.
    Focus,
    /// Report a state snapshot.
    Stats(oneshot::Sender<BridgeStats>),
    /// Stop the task.
    Shutdown,
}

// ============================================================================
// PendingRequest
// ============================================================================

/// A validated request, queued or awaiting its terminal answer.
pub(crate) struct PendingRequest {
    pub request_id: RequestId,
    pub action: Action,
    pub payload: Value,
    /// Serialized outbound message.
    pub message: String,
    pub reservation: Option<Reservation>,
    responder: Responder,
}

impl PendingRequest {
    pub(crate) fn new(
        request_id: RequestId,
        action: Action,
        payload: Value,
        message: String,
        reservation: Option<Reservation>,
        responder: Responder,
    ) -> Self {
        Self {
            request_id,
            action,
            payload,
            message,
            reservation,
            responder,
        }
    }

    /// Delivers the outcome. A caller that stopped waiting is ignored.
    pub(crate) fn settle(self, result: Result<BridgeResponse>) {
        if self.responder.send(result).is_err() {
            debug!(request_id = %self.request_id, "Caller stopped waiting");
        }
    }
}

// ============================================================================
// BridgeStats
// ============================================================================

/// Point-in-time view of the bridge's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStats {
    /// Requests waiting for the transport.
    pub queued: usize,
    /// Requests sent and awaiting a terminal answer.
    pub outstanding: usize,
    /// The request currently occupying the transport.
    pub active: Option<RequestId>,
    /// In-flight exclusive actions.
    pub exclusive_in_flight: Vec<(Action, usize)>,
    /// Ad admissions inside the rate window.
    pub rate_window: usize,
}

// ============================================================================
// BridgeState
// ============================================================================

/// State owned by the bridge task.
pub(crate) struct BridgeState {
    pub(super) validator: RequestValidator,
    /// Not yet sent, FIFO.
    pub(super) queue: VecDeque<PendingRequest>,
    /// Sent, awaiting a terminal answer. Disjoint from `queue`.
    pub(super) outstanding: FxHashMap<RequestId, PendingRequest>,
    /// The one request currently handed to the transport.
    pub(super) active: Option<RequestId>,
    pub(super) transport: SharedTransport,
    pub(super) bus: NotificationBus,
    /// Set by handlers that want the queue drained once they return.
    pub(super) drain_scheduled: bool,
}

impl BridgeState {
    pub(crate) fn new(config: &BridgeConfig, transport: SharedTransport, bus: NotificationBus) -> Self {
        Self {
            validator: RequestValidator::new(config),
            queue: VecDeque::new(),
            outstanding: FxHashMap::default(),
            active: None,
            transport,
            bus,
            drain_scheduled: false,
        }
    }

    /// Command loop. Runs until shutdown or until every handle is dropped.
    pub(crate) async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<BridgeCommand>) {
        while let Some(command) = command_rx.recv().await {
            let stop = self.handle_command(command);

            while std::mem::take(&mut self.drain_scheduled) {
                self.drain();
            }

            if stop {
                debug!("Shutdown command received");
                break;
            }
        }

        self.fail_pending_requests();
        debug!("Bridge task terminated");
    }

    /// Handles one command. Returns `true` on shutdown.
    fn handle_command(&mut self, command: BridgeCommand) -> bool {
        match command {
            BridgeCommand::Submit {
                action,
                payload,
                responder,
            } => self.submit(action, payload, responder),

            BridgeCommand::Inbound(raw) => self.on_inbound_message(&raw),

            BridgeCommand::Focus => self.on_focus(),

            BridgeCommand::Stats(reply) => {
                let _ = reply.send(self.stats());
            }

            BridgeCommand::Shutdown => return true,
        }
        false
    }

    /// Emits a notification to every listener.
    #[inline]
    pub(super) fn notify(&self, notification: Notification) {
        self.bus.notify(&notification);
    }

    /// Queues a drain for after the current handler.
    #[inline]
    pub(super) fn schedule_drain(&mut self) {
        self.drain_scheduled = true;
    }

    fn stats(&mut self) -> BridgeStats {
        BridgeStats {
            queued: self.queue.len(),
            outstanding: self.outstanding.len(),
            active: self.active.clone(),
            exclusive_in_flight: self.validator.exclusivity().snapshot(),
            rate_window: self.validator.window_occupancy(Instant::now()),
        }
    }

    /// Rejects every queued and outstanding request with `BridgeClosed`.
    fn fail_pending_requests(&mut self) {
        let pending: Vec<PendingRequest> = self
            .queue
            .drain(..)
            .chain(self.outstanding.drain().map(|(_, request)| request))
            .collect();
        let count = pending.len();

        for request in pending {
            self.validator
                .release(request.action, request.reservation.as_ref());
            request.settle(Err(Error::BridgeClosed));
        }
        self.active = None;

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}
