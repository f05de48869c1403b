//! Response and event demultiplexer.
//!
//! Routes each inbound message to the outstanding request it answers, or
//! to the notification bus if it is an event. Nothing here ever fails
//! loudly: malformed input and orphan answers become notifications.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::notify::Notification;
use crate::protocol::{
    BridgeResponse, HostEvent, InboundMessage, InboundResponse, ParsedEvent, ResponseStatus,
    STATUS_SUCCESS,
};

use super::state::BridgeState;

// ============================================================================
// BridgeState - Inbound
// ============================================================================

impl BridgeState {
    /// Entry point for text delivered by the host.
    pub(super) fn on_inbound_message(&mut self, raw: &str) {
        self.notify(Notification::ResponseRaw {
            raw: raw.to_string(),
        });

        match InboundMessage::decode(raw) {
            Ok(InboundMessage::Response(response)) => self.handle_response(response),
            Ok(InboundMessage::Event(event)) => self.handle_event(event),
            Ok(InboundMessage::Ignored) => trace!("Ignoring inbound message"),
            Err(err) => {
                warn!(error = %err, "Failed to parse inbound message");
                self.notify(Notification::ResponseParseError {
                    message: err.to_string(),
                });
            }
        }
    }

    fn handle_event(&mut self, event: HostEvent) {
        trace!(event = %event.event, "Host event");
        let parsed = event.parse();

        self.notify(Notification::EventReceived { event });

        if let ParsedEvent::AdAvailabilityChanged { ad_type, available } = parsed {
            self.notify(Notification::AdAvailabilityChanged { ad_type, available });
        }
    }

    fn handle_response(&mut self, response: InboundResponse) {
        let Some(request_id) = response
            .request_id
            .clone()
            .filter(|id| !id.as_str().is_empty())
        else {
            debug!("Response without requestId dropped");
            return;
        };

        if !self.outstanding.contains_key(&request_id) {
            warn!(request_id = %request_id, "Response for unknown request");
            self.notify(Notification::ResponseOrphan { response });
            return;
        }

        self.notify(Notification::ResponseReceived {
            response: response.clone(),
        });

        let status = response.status();
        if !status.is_terminal() {
            trace!(request_id = %request_id, "Heartbeat");
            return;
        }

        let Some(request) = self.outstanding.remove(&request_id) else {
            return;
        };
        let action = request.action;
        self.validator.release(action, request.reservation.as_ref());

        // An answer for a non-active request leaves the slot alone.
        if self.active.as_ref() == Some(&request_id) {
            self.active = None;
        }

        let payload = response.payload_or_empty();

        if status == ResponseStatus::Success {
            debug!(request_id = %request_id, action = %action, "Request succeeded");
            self.notify(Notification::RequestSuccess {
                action,
                request_id: request_id.clone(),
                payload: payload.clone(),
            });
            request.settle(Ok(BridgeResponse {
                request_id: request_id.clone(),
                action,
                status: STATUS_SUCCESS.to_string(),
                payload,
            }));
        } else {
            let error = Error::remote(
                request_id.clone(),
                action,
                response.status_label(),
                response.error_code(),
                response.error_message(),
                payload.clone(),
            );
            debug!(request_id = %request_id, action = %action, code = error.code(), "Request failed on host");
            self.notify(Notification::RequestError {
                action: action.as_str().to_string(),
                request_id: Some(request_id.clone()),
                error: error.info(),
                payload: Some(payload),
            });
            request.settle(Err(error));
        }

        self.notify(Notification::RequestCompleted {
            action,
            request_id,
            status: response.status_label().to_string(),
        });

        self.schedule_drain();
    }
}
