//! Ownership-tracked event subscriptions.
//!
//! Every transport signal the controller consumes (presence, tiles, volume,
//! data messages, exit triggers) is delivered through an [`EventSource`].
//! Subscribing returns a [`Subscription`] that must be held for delivery to
//! continue; dropping it unregisters the handler. This forces each component
//! to release its listeners on disposal instead of leaving callbacks aimed
//! at torn-down state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Boxed event handler. Handlers run on the emitter's task and must not block.
pub type EventHandler<T> = Box<dyn Fn(T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    handlers: HashMap<u64, Arc<EventHandler<T>>>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            handlers: HashMap::new(),
        }
    }
}

/// A multi-subscriber event channel with synchronous dispatch.
pub struct EventSource<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for EventSource<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register a handler. Delivery stops when the returned subscription
    /// is cancelled or dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.insert(id, Arc::new(Box::new(handler)));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    lock(&registry).handlers.remove(&id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

impl<T: Clone> EventSource<T> {
    /// Deliver an event to every current subscriber.
    ///
    /// Handlers are snapshotted before dispatch so a handler may subscribe
    /// or cancel without deadlocking the registry.
    pub fn emit(&self, event: T) {
        let handlers: Vec<Arc<EventHandler<T>>> =
            lock(&self.registry).handlers.values().cloned().collect();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

/// Recover from mutex poisoning; the registry stays usable either way.
fn lock<T>(mutex: &Mutex<Registry<T>>) -> std::sync::MutexGuard<'_, Registry<T>> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Handle for one registered event handler.
///
/// Cancellation is idempotent and safe after the source is gone.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Explicitly unregister the handler. Equivalent to dropping.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_emit() {
        let source = EventSource::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _sub = source.subscribe(move |v| {
            seen_clone.lock().unwrap().push(v);
        });

        source.emit(1);
        source.emit(2);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let source = EventSource::<u32>::new();
        source.emit(42);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let source = EventSource::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let sub = source.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        source.emit(1);
        sub.cancel();
        source.emit(2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_cancels() {
        let source = EventSource::<u32>::new();
        {
            let _sub = source.subscribe(|_| {});
            assert_eq!(source.subscriber_count(), 1);
        }
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_multiple_subscribers_each_receive() {
        let source = EventSource::<&'static str>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let _s1 = source.subscribe(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _s2 = source.subscribe(move |_| {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        source.emit("hello");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancel_after_source_dropped_is_safe() {
        let source = EventSource::<u32>::new();
        let sub = source.subscribe(|_| {});
        drop(source);
        sub.cancel();
    }

    #[test]
    fn test_handler_may_cancel_other_subscription_during_emit() {
        let source = EventSource::<u32>::new();
        let victim = Arc::new(Mutex::new(None::<Subscription>));

        *victim.lock().unwrap() = Some(source.subscribe(|_| {}));

        let victim_clone = Arc::clone(&victim);
        let _killer = source.subscribe(move |_| {
            if let Some(sub) = victim_clone.lock().unwrap().take() {
                sub.cancel();
            }
        });

        // Must not deadlock.
        source.emit(1);
        assert_eq!(source.subscriber_count(), 1);
    }
}
