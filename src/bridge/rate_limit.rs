//! Sliding-window admission control for one action.
//!
//! A [`Reservation`] counts against the ceiling from the moment it is
//! granted. [`RateLimiter::commit`] marks it as sent; [`RateLimiter::release`]
//! gives the slot back before the window would expire it.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::Action;

// ============================================================================
// Reservation
// ============================================================================

/// A granted admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// Unique per limiter; distinguishes admissions granted at the same instant.
    token: u64,
    /// Timestamp used for the admission check.
    at: Instant,
}

impl Reservation {
    /// Returns the admission timestamp.
    #[inline]
    #[must_use]
    pub fn at(&self) -> Instant {
        self.at
    }
}

// ============================================================================
// RateLimiter
// ============================================================================

/// Window entry.
#[derive(Debug, Clone, Copy)]
struct Entry {
    token: u64,
    at: Instant,
    committed: bool,
}

/// Sliding time-window limiter: at most `limit` admissions whose age is
/// below `window`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    action: Action,
    limit: usize,
    window: Duration,
    entries: VecDeque<Entry>,
    next_token: u64,
}

impl RateLimiter {
    /// Creates a limiter for `action`.
    #[must_use]
    pub fn new(action: Action, limit: usize, window: Duration) -> Self {
        Self {
            action,
            limit,
            window,
            entries: VecDeque::with_capacity(limit),
            next_token: 0,
        }
    }

    /// Grants an admission at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RateLimitExceeded`] if `limit` admissions are
    /// already inside the window.
    pub fn reserve(&mut self, now: Instant) -> Result<Reservation> {
        self.prune(now);

        if self.entries.len() >= self.limit {
            trace!(action = %self.action, occupied = self.entries.len(), "Rate window full");
            return Err(Error::rate_limit_exceeded(
                self.action,
                self.limit,
                self.window.as_millis() as u64,
            ));
        }

        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.entries.push_back(Entry {
            token,
            at: now,
            committed: false,
        });

        Ok(Reservation { token, at: now })
    }

    /// Marks the reservation as sent. No-op if it already aged out.
    pub fn commit(&mut self, reservation: &Reservation) {
        if let Some(entry) = self.find_mut(reservation) {
            entry.committed = true;
        }
    }

    /// Removes the reservation from the window. Idempotent.
    pub fn release(&mut self, reservation: &Reservation) {
        self.entries.retain(|e| e.token != reservation.token);
    }

    /// Removes the reservation only if it was never committed.
    pub fn release_uncommitted(&mut self, reservation: &Reservation) {
        self.entries
            .retain(|e| e.token != reservation.token || e.committed);
    }

    /// Returns the number of admissions inside the window at `now`.
    #[must_use]
    pub fn occupancy(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.entries.len()
    }

    /// Returns the admission ceiling.
    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the window length.
    #[inline]
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.entries
            .retain(|e| now.saturating_duration_since(e.at) < window);
    }

    fn find_mut(&mut self, reservation: &Reservation) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.token == reservation.token)
    }
}

// ============================================================================
// Tests
// ============================================================================
