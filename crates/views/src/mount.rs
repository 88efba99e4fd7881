//! View lifecycle: mount, react, unmount.

use rivo_events::{
    emit_event, event_names, now_ms, CacheModeChangedEvent, EventBusRef, MetricsUpdatedEvent,
};
use rivo_metrics::{MetricsService, Subscription};
use rivo_mode::{CacheMode, ModeBroadcaster};
use std::sync::Arc;

/// Something a view (re)loads when mounted or when the cache mode changes.
pub trait ViewLoader: Send + Sync {
    fn load(&self, mode: CacheMode);
}

/// A view bound to the shared metrics and cache-mode sources.
///
/// Mounting loads once with the current mode, then reloads on every mode
/// notification. Unmounting (explicitly or by drop) detaches both
/// subscriptions; no notification reaches the view afterwards.
pub struct MountedView {
    name: String,
    subscriptions: Vec<Subscription>,
}

impl MountedView {
    pub fn mount(
        name: impl Into<String>,
        metrics: Option<&MetricsService>,
        mode: &ModeBroadcaster,
        loader: Arc<dyn ViewLoader>,
        bus: EventBusRef,
    ) -> Self {
        let name = name.into();
        let mut subscriptions = Vec::with_capacity(2);

        // The broadcaster does not replay, so read the flag directly.
        loader.load(mode.mode());

        if let Some(metrics) = metrics {
            let view = name.clone();
            let bus = Arc::clone(&bus);
            subscriptions.push(metrics.subscribe(move |snapshot| {
                let event = MetricsUpdatedEvent {
                    view: view.clone(),
                    metrics: snapshot,
                    lcp_status: snapshot.lcp_status().label().to_string(),
                    timestamp_ms: now_ms(),
                };
                emit_event(bus.as_ref(), event_names::METRICS_UPDATED, &event);
            }));
        }

        let view = name.clone();
        subscriptions.push(mode.subscribe(move |enabled| {
            let mode = CacheMode::from(enabled);
            let event = CacheModeChangedEvent {
                view: view.clone(),
                enabled,
                mode,
                timestamp_ms: now_ms(),
            };
            emit_event(bus.as_ref(), event_names::CACHE_MODE_CHANGED, &event);
            tracing::debug!(view = %view, %mode, "reloading after cache mode change");
            loader.load(mode);
        }));

        tracing::debug!(view = %name, "view mounted");
        Self {
            name,
            subscriptions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    /// Detach from both sources. Idempotent.
    pub fn unmount(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        tracing::debug!(view = %self.name, "view unmounted");
    }
}

impl Drop for MountedView {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for MountedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedView")
            .field("name", &self.name)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
