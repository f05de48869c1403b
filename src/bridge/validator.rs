//! Request admission.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. Action is registered → [`Error::InvalidAction`]
//! 2. Exclusive action not in flight → [`Error::DuplicateExclusiveRequest`]
//! 3. Payload shape → [`Error::InvalidPayload`]
//! 4. Rate window (ad display only) → [`Error::RateLimitExceeded`]
//!
//! A rejected request leaves no trace in the tracker or the window.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::protocol::Action;

use super::config::{BridgeConfig, SlotRelease};
use super::exclusivity::ExclusivityTracker;
use super::rate_limit::{RateLimiter, Reservation};

// ============================================================================
// Admission
// ============================================================================

/// An accepted request's claims on the tracker and the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// The validated action.
    pub action: Action,
    /// Window slot, for rate-limited actions.
    pub reservation: Option<Reservation>,
}

// ============================================================================
// RequestValidator
// ============================================================================

/// Validates requests and owns the bookkeeping they claim.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    exclusivity: ExclusivityTracker,
    limiter: RateLimiter,
    slot_release: SlotRelease,
}

impl RequestValidator {
    /// Creates a validator from `config`.
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            exclusivity: ExclusivityTracker::new(),
            limiter: RateLimiter::new(Action::ShowAd, config.ad_rate_limit, config.ad_rate_window),
            slot_release: config.slot_release,
        }
    }

    /// Validates a request and claims its slots.
    ///
    /// # Errors
    ///
    /// See the module docs for the check order.
    pub fn validate(&mut self, name: &str, payload: &Value, now: Instant) -> Result<Admission> {
        let action = Action::from_name(name).ok_or_else(|| Error::invalid_action(name))?;

        if action.is_exclusive() && self.exclusivity.is_blocked(action) {
            return Err(Error::duplicate_request(action));
        }

        check_payload(action, payload)?;

        let reservation = if action.is_rate_limited() {
            Some(self.limiter.reserve(now)?)
        } else {
            None
        };

        // Cannot fail: blocked exclusive actions were rejected above.
        let acquired = self.exclusivity.try_acquire(action);
        debug_assert!(acquired);

        Ok(Admission {
            action,
            reservation,
        })
    }

    /// Records that the request reached the transport.
    pub fn commit(&mut self, reservation: Option<&Reservation>) {
        if let Some(reservation) = reservation {
            self.limiter.commit(reservation);
        }
    }

    /// Undoes an admission for a request that was never queued.
    pub fn rollback(&mut self, admission: &Admission) {
        self.exclusivity.release(admission.action);
        if let Some(reservation) = &admission.reservation {
            self.limiter.release(reservation);
        }
    }

    /// Releases the claims of a request that reached a terminal state.
    ///
    /// The window slot follows the configured [`SlotRelease`] policy.
    pub fn release(&mut self, action: Action, reservation: Option<&Reservation>) {
        self.exclusivity.release(action);

        if let Some(reservation) = reservation {
            match self.slot_release {
                SlotRelease::Immediate => self.limiter.release(reservation),
                SlotRelease::AgeOut => self.limiter.release_uncommitted(reservation),
            }
        }
    }

    /// Releases the claims of a request the transport refused.
    ///
    /// The window slot is always given back: the host never saw the request.
    pub fn release_failed_send(&mut self, action: Action, reservation: Option<&Reservation>) {
        self.exclusivity.release(action);
        if let Some(reservation) = reservation {
            self.limiter.release(reservation);
        }
    }

    /// Returns the exclusivity tracker.
    #[inline]
    #[must_use]
    pub fn exclusivity(&self) -> &ExclusivityTracker {
        &self.exclusivity
    }

    /// Returns the window occupancy at `now`.
    #[inline]
    #[must_use]
    pub fn window_occupancy(&mut self, now: Instant) -> usize {
        self.limiter.occupancy(now)
    }
}

// ============================================================================
// Payload Checks
// ============================================================================

fn check_payload(action: Action, payload: &Value) -> Result<()> {
    if let Some(category) = action.category() {
        let valid = payload
            .get(category.field())
            .and_then(Value::as_str)
            .is_some_and(|value| category.is_valid_value(value));

        if !valid {
            return Err(Error::invalid_payload(
                action,
                format!("{} must be one of interstitial, rewarded, banner", category.field()),
            ));
        }
    }

    if action.requires_product() {
        let valid = payload
            .get("productId")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.trim().is_empty());

        if !valid {
            return Err(Error::invalid_payload(action, "productId is required"));
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
