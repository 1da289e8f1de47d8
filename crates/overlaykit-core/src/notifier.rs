//! Change notification.
//!
//! A registry of synchronous callbacks with unsubscribe handles. Each
//! notifier instance is owned by whatever owns the state it reports on;
//! there is no global registry.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Subscription handle for unsubscribing from notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Type alias for notification handler functions
type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Registry of change subscribers.
///
/// Handlers run synchronously on the notifying thread and should return
/// quickly to avoid blocking dispatch.
pub struct ChangeNotifier<E> {
    handlers: Arc<RwLock<HashMap<SubscriptionId, Handler<E>>>>,
}

impl<E> ChangeNotifier<E> {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a handler, returning the handle needed to remove it
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, Box::new(handler));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Remove a handler
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Call every registered handler with the event
    pub fn notify(&self, event: &E) {
        let handlers = self.handlers.read();
        for handler in handlers.values() {
            handler(event);
        }
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
