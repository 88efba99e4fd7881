//! The cache-mode broadcaster.

use crate::mode::{CacheMode, REDIS_ENABLED_KEY};
use rivo_bus::{SubscriberList, Subscription};
use rivo_context::Environment;
use rivo_storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single source of truth for the cache-mode flag.
///
/// The flag is read once from durable storage at construction and written
/// back on every toggle. Without durable storage it lives in memory only.
pub struct ModeBroadcaster {
    enabled: AtomicBool,
    store: Option<Arc<dyn KeyValueStore>>,
    subscribers: SubscriberList<bool>,
}

impl ModeBroadcaster {
    pub fn new(env: &Environment) -> Self {
        let store = env.durable_store().cloned();
        let mode = match &store {
            Some(store) => load_mode(store.as_ref()),
            None => CacheMode::Off,
        };

        tracing::debug!(%mode, persisted = store.is_some(), "cache mode initialized");

        Self {
            enabled: AtomicBool::new(mode.is_enabled()),
            store,
            subscribers: SubscriberList::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn mode(&self) -> CacheMode {
        CacheMode::from(self.is_enabled())
    }

    /// Set the flag, persist it and notify every subscriber.
    ///
    /// No change check: repeating the current value still persists and
    /// notifies.
    pub fn toggle(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        let mode = CacheMode::from(enabled);

        if let Some(store) = &self.store {
            if let Err(e) = store.set(REDIS_ENABLED_KEY, mode.as_flag_str()) {
                tracing::warn!(error = %e, %mode, "failed to persist cache mode");
            }
        }

        tracing::info!(%mode, "cache mode toggled");
        self.subscribers.notify(&enabled);
    }

    /// Toggle to the opposite of the current value and return the new value.
    pub fn flip(&self) -> bool {
        let enabled = !self.is_enabled();
        self.toggle(enabled);
        enabled
    }

    /// Register `callback` for future toggles.
    ///
    /// Unlike the metrics service, the current value is not replayed; read
    /// [`ModeBroadcaster::is_enabled`] at subscribe time if it is needed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.subscribers
            .subscribe(move |enabled: &bool| callback(*enabled))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

fn load_mode(store: &dyn KeyValueStore) -> CacheMode {
    match store.get(REDIS_ENABLED_KEY) {
        Ok(Some(value)) => CacheMode::from_flag_str(&value),
        Ok(None) => CacheMode::Off,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted cache mode");
            CacheMode::Off
        }
    }
}
