//! Per-action in-flight counters for exclusive actions.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;

use crate::protocol::Action;

// ============================================================================
// ExclusivityTracker
// ============================================================================

/// Counts queued-or-sent instances of each exclusive action.
///
/// Non-exclusive actions are never tracked.
#[derive(Debug, Clone, Default)]
pub struct ExclusivityTracker {
    counters: FxHashMap<Action, usize>,
}

impl ExclusivityTracker {
    /// Creates an empty tracker.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a slot for `action`.
    ///
    /// Returns `false`, without side effect, if `action` is exclusive and
    /// already in flight.
    pub fn try_acquire(&mut self, action: Action) -> bool {
        if !action.is_exclusive() {
            return true;
        }

        let counter = self.counters.entry(action).or_default();
        if *counter > 0 {
            return false;
        }
        *counter += 1;
        true
    }

    /// Gives back a slot claimed by [`try_acquire`](Self::try_acquire).
    pub fn release(&mut self, action: Action) {
        if !action.is_exclusive() {
            return;
        }

        if let Some(counter) = self.counters.get_mut(&action) {
            *counter = counter.saturating_sub(1);
            if *counter == 0 {
                self.counters.remove(&action);
            }
        }
    }

    /// Returns the in-flight count for `action`.
    #[inline]
    #[must_use]
    pub fn in_flight(&self, action: Action) -> usize {
        self.counters.get(&action).copied().unwrap_or_default()
    }

    /// Returns `true` if `action` is exclusive and in flight.
    #[inline]
    #[must_use]
    pub fn is_blocked(&self, action: Action) -> bool {
        self.in_flight(action) > 0
    }

    /// Returns every in-flight exclusive action, in registry order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Action, usize)> {
        Action::ALL
            .into_iter()
            .filter_map(|action| {
                let count = self.in_flight(action);
                (count > 0).then_some((action, count))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
