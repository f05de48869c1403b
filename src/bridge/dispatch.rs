//! Dispatch queue.
//!
//! Validated requests wait in FIFO order and go to the transport one at a
//! time: nothing is sent while the active slot is occupied.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, error, trace};

use crate::error::Error;
use crate::identifiers::RequestId;
use crate::notify::Notification;
use crate::protocol::OutboundMessage;
use crate::transport::TransportError;

use super::state::{BridgeState, PendingRequest, Responder, reject};

// ============================================================================
// BridgeState - Submission
// ============================================================================

impl BridgeState {
    /// Validates a request and queues it, or rejects it immediately.
    pub(super) fn submit(&mut self, action: String, payload: Value, responder: Responder) {
        let admission = match self.validator.validate(&action, &payload, Instant::now()) {
            Ok(admission) => admission,
            Err(err) => {
                debug!(action = %action, error = %err, "Request rejected");
                let info = err.info();
                self.notify(Notification::RequestRejected {
                    action: action.clone(),
                    payload,
                    error: info.clone(),
                });
                self.notify(Notification::RequestError {
                    action,
                    request_id: None,
                    error: info,
                    payload: None,
                });
                reject(responder, err);
                return;
            }
        };

        if !self.transport.is_available() {
            self.validator.rollback(&admission);
            let err = Error::transport_unavailable(admission.action);
            debug!(action = %admission.action, "Transport unavailable, request rejected");
            self.notify(Notification::BridgeUnavailable);
            self.notify(Notification::RequestError {
                action,
                request_id: None,
                error: err.info(),
                payload: None,
            });
            reject(responder, err);
            return;
        }

        let request_id = RequestId::generate();
        let message =
            match OutboundMessage::new(admission.action, request_id.clone(), payload.clone())
                .to_json()
            {
                Ok(message) => message,
                Err(err) => {
                    self.validator.rollback(&admission);
                    self.notify(Notification::RequestError {
                        action,
                        request_id: None,
                        error: err.info(),
                        payload: None,
                    });
                    reject(responder, err);
                    return;
                }
            };

        self.enqueue(PendingRequest::new(
            request_id,
            admission.action,
            payload,
            message,
            admission.reservation,
            responder,
        ));
    }

    /// Appends a request and tries to send it.
    pub(super) fn enqueue(&mut self, request: PendingRequest) {
        trace!(
            request_id = %request.request_id,
            action = %request.action,
            queued = self.queue.len() + 1,
            "Request queued"
        );
        self.queue.push_back(request);
        self.drain();
    }
}

// ============================================================================
// BridgeState - Draining
// ============================================================================

impl BridgeState {
    /// Sends the head of the queue if the active slot is free.
    ///
    /// An unavailable transport pauses the queue without failing anything.
    pub(super) fn drain(&mut self) {
        if self.active.is_some() || self.queue.is_empty() {
            return;
        }

        let Some(transport) = self.transport.usable() else {
            debug!(queued = self.queue.len(), "Transport unavailable, queue paused");
            self.notify(Notification::BridgeUnavailable);
            return;
        };

        let Some(request) = self.queue.pop_front() else {
            return;
        };

        let request_id = request.request_id.clone();
        self.active = Some(request_id.clone());
        self.validator.commit(request.reservation.as_ref());

        self.notify(Notification::RequestSent {
            action: request.action,
            request_id: request_id.clone(),
            payload: request.payload.clone(),
        });

        let result = transport.post_message(&request.message);
        self.outstanding.insert(request_id.clone(), request);

        match result {
            Ok(()) => trace!(request_id = %request_id, "Request sent"),
            Err(err) => self.fail_send(&request_id, err),
        }
    }

    /// Rolls back a request whose transport call failed.
    fn fail_send(&mut self, request_id: &RequestId, err: TransportError) {
        error!(request_id = %request_id, error = %err, "post_message failed");

        if self.active.as_ref() == Some(request_id) {
            self.active = None;
        }

        let Some(request) = self.outstanding.remove(request_id) else {
            return;
        };

        let action = request.action;
        self.validator
            .release_failed_send(action, request.reservation.as_ref());

        let error = Error::send_failed(request_id.clone(), action, err.code, err.message);
        let info = error.info();
        request.settle(Err(error));

        self.notify(Notification::RequestError {
            action: action.as_str().to_string(),
            request_id: Some(request_id.clone()),
            error: info,
            payload: None,
        });

        self.schedule_drain();
    }

    /// Host regained focus: resume draining if the transport is back.
    pub(super) fn on_focus(&mut self) {
        if !self.transport.is_available() {
            debug!("Focus signal with transport still unavailable");
            return;
        }

        self.notify(Notification::BridgeAvailable);
        self.drain();
    }
}
