//! Listener fan-out.
//!
//! Listeners are invoked from the bridge task, in subscription order.
//! A listener that panics is logged and skipped; the remaining listeners
//! and the bridge itself are unaffected.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{error, trace};

use crate::identifiers::SubscriptionId;

use super::Notification;

// ============================================================================
// Types
// ============================================================================

/// Notification listener callback.
pub type Listener = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Ordered listener list.
type ListenerList = Vec<(SubscriptionId, Listener)>;

// ============================================================================
// NotificationBus
// ============================================================================

/// Fan-out of lifecycle notifications to external observers.
#[derive(Clone, Default)]
pub struct NotificationBus {
    listeners: Arc<Mutex<ListenerList>>,
}

impl NotificationBus {
    /// Creates an empty bus.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    ///
    /// Takes effect from the next [`notify`](Self::notify) pass.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.listeners.lock().push((id, Arc::new(listener)));
        trace!(subscription = %id, "Listener subscribed");

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_listener(&self.listeners, id)
    }

    /// Returns the number of registered listeners.
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Invokes every current listener with `notification`.
    ///
    /// Iterates over a snapshot, so listeners may subscribe or unsubscribe
    /// while being notified.
    pub fn notify(&self, notification: &Notification) {
        let snapshot: ListenerList = self.listeners.lock().clone();

        for (id, listener) in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(notification))) {
                error!(
                    subscription = %id,
                    notification = notification.name(),
                    error = panic_message(panic.as_ref()),
                    "Listener panicked"
                );
            }
        }
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle returned by [`NotificationBus::subscribe`].
///
/// Dropping the handle does NOT unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe).
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    listeners: Weak<Mutex<ListenerList>>,
}

impl Subscription {
    /// Returns the subscription ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the listener. Returns `false` if already removed.
    pub fn unsubscribe(self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| remove_listener(&listeners, self.id))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn remove_listener(listeners: &Mutex<ListenerList>, id: SubscriptionId) -> bool {
    let mut guard = listeners.lock();
    let before = guard.len();
    guard.retain(|(existing, _)| *existing != id);
    before != guard.len()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

// ============================================================================
// Tests
// ============================================================================
