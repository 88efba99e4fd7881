//! Subscriber fan-out for process-wide state holders.
//!
//! Provides an ordered subscriber list whose notification pass works on a
//! snapshot of the registered callbacks, so callbacks may unsubscribe (even
//! themselves) or subscribe new callbacks while a pass is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback type stored in a [`SubscriberList`].
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct Slot<T> {
    id: u64,
    live: Arc<AtomicBool>,
    callback: Callback<T>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            slots: Vec::new(),
        }
    }
}

/// Type-erased removal so a [`Subscription`] does not carry the payload type.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: 'static> Detach for Mutex<Registry<T>> {
    fn detach(&self, id: u64) {
        let mut registry = self.lock().unwrap_or_else(|e| e.into_inner());
        registry.slots.retain(|slot| slot.id != id);
    }
}

/// Ordered list of callbacks notified in subscription order.
pub struct SubscriberList<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Default for SubscriberList<T> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<T: 'static> SubscriberList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry<T>> {
        // Callbacks never run under this lock, so poisoning only means a
        // panic inside `Vec` bookkeeping; the data is still consistent.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a callback. It is appended after every existing subscriber.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let live = Arc::new(AtomicBool::new(true));
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.slots.push(Slot {
                id,
                live: Arc::clone(&live),
                callback: Arc::new(callback),
            });
            id
        };

        let registry: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        let registry: Weak<dyn Detach> = registry;

        tracing::trace!(id, "subscriber registered");

        Subscription {
            inner: Arc::new(SubscriptionInner { id, live, registry }),
        }
    }

    /// Invoke every callback registered at call time, in subscription order.
    ///
    /// A callback unsubscribed before the pass reaches it is skipped; callbacks
    /// registered during the pass are not invoked until the next one.
    /// Returns the number of callbacks actually invoked.
    pub fn notify(&self, value: &T) -> usize {
        let snapshot: Vec<(Arc<AtomicBool>, Callback<T>)> = self
            .lock()
            .slots
            .iter()
            .map(|slot| (Arc::clone(&slot.live), Arc::clone(&slot.callback)))
            .collect();

        let mut invoked = 0;
        for (live, callback) in snapshot {
            if live.load(Ordering::Acquire) {
                callback(value);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }
}

struct SubscriptionInner {
    id: u64,
    live: Arc<AtomicBool>,
    registry: Weak<dyn Detach>,
}

/// Handle returned by [`SubscriberList::subscribe`].
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it. Clones share the same
/// registration, so a callback can hold its own handle.
#[derive(Clone)]
#[must_use = "dropping a Subscription does not unsubscribe; keep it to be able to unsubscribe"]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// Remove the callback. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if self.inner.live.swap(false, Ordering::AcqRel) {
            if let Some(registry) = self.inner.registry.upgrade() {
                registry.detach(self.inner.id);
            }
            tracing::trace!(id = self.inner.id, "subscriber removed");
        }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.inner.live.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("active", &self.is_active())
            .finish()
    }
}
