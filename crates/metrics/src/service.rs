//! The telemetry aggregator.

use crate::sample::{MetricKind, Sample};
use crate::snapshot::PerformanceMetrics;
use rivo_bus::{SubscriberList, Subscription};
use rivo_context::{BrowsingContext, Environment, Reporting, ResourceTiming, Signal, TimerHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Default period of the processing-time recompute.
pub const DEFAULT_PROCESSING_INTERVAL: Duration = Duration::from_millis(100);

/// Default delay before the script bundle size is measured.
pub const DEFAULT_BUNDLE_PROBE_DELAY: Duration = Duration::from_millis(2000);

/// Signals wired at startup and how each is reported.
const OBSERVED_SIGNALS: [(Signal, Reporting); 4] = [
    (Signal::LargestContentfulPaint, Reporting::AllChanges),
    (Signal::CumulativeLayoutShift, Reporting::AllChanges),
    (Signal::InteractionToNextPaint, Reporting::AllChanges),
    (Signal::TimeToFirstByte, Reporting::Final),
];

/// Configuration for the aggregator's background activities.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// How often processing time is recomputed.
    pub processing_interval: Duration,
    /// Delay before the one-shot bundle size probe runs.
    pub bundle_probe_delay: Duration,
    /// URL suffix identifying script resources.
    pub script_suffix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            processing_interval: DEFAULT_PROCESSING_INTERVAL,
            bundle_probe_delay: DEFAULT_BUNDLE_PROBE_DELAY,
            script_suffix: ".js".to_string(),
        }
    }
}

/// Total transferred script size in kilobytes.
pub fn script_bundle_kb(entries: &[ResourceTiming], script_suffix: &str) -> f64 {
    let bytes: u64 = entries
        .iter()
        .filter(|entry| entry.has_suffix(script_suffix))
        .map(ResourceTiming::transferred_bytes)
        .fold(0u64, u64::saturating_add);
    bytes as f64 / 1024.0
}

struct Shared {
    metrics: Mutex<PerformanceMetrics>,
    subscribers: SubscriberList<PerformanceMetrics>,
    start_ms: f64,
    bundle_probed: AtomicBool,
}

impl Shared {
    fn snapshot(&self) -> PerformanceMetrics {
        *self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, sample: Sample) -> bool {
        let Some(value) = sample.normalized() else {
            tracing::debug!(kind = %sample.kind, value = sample.value, "ignoring non-finite sample");
            return false;
        };

        let snapshot = {
            let mut metrics = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
            if metrics.get(sample.kind) == value {
                return false;
            }
            metrics.set(sample.kind, value);
            *metrics
        };

        tracing::trace!(kind = %sample.kind, value, "metric changed");
        self.subscribers.notify(&snapshot);
        true
    }

    fn probe_bundle(&self, entries: &[ResourceTiming], script_suffix: &str) {
        if self.bundle_probed.swap(true, Ordering::SeqCst) {
            return;
        }
        let kb = script_bundle_kb(entries, script_suffix);
        tracing::debug!(entries = entries.len(), kb, "measured script bundle size");
        self.record(Sample::bundle_size(kb));
    }
}

/// Live, deduplicated performance snapshot with subscriber fan-out.
///
/// When the environment has a browsing context the service wires itself to
/// the paint, shift, interaction and first-byte signals, recomputes
/// processing time on an interval and measures the script bundle once.
/// Without one, nothing is wired and only [`MetricsService::record`] changes
/// the snapshot.
pub struct MetricsService {
    shared: Arc<Shared>,
    timers: Vec<TimerHandle>,
}

impl MetricsService {
    pub fn new(env: &Environment) -> Self {
        Self::with_config(env, MetricsConfig::default())
    }

    pub fn with_config(env: &Environment, config: MetricsConfig) -> Self {
        let start_ms = env
            .browsing_context()
            .map(|context| context.now_ms())
            .unwrap_or(0.0);

        let shared = Arc::new(Shared {
            metrics: Mutex::new(PerformanceMetrics::default()),
            subscribers: SubscriberList::new(),
            start_ms,
            bundle_probed: AtomicBool::new(false),
        });

        let timers = match env.browsing_context() {
            Some(context) => wire(&shared, context, &config),
            None => {
                tracing::debug!("no browsing context, performance observation disabled");
                Vec::new()
            }
        };

        Self { shared, timers }
    }

    /// Register `callback` for every future change.
    ///
    /// The callback is then invoked once, synchronously, with the current
    /// snapshot so late subscribers never start blank. Registration and the
    /// snapshot read happen under the metrics lock: a change recorded
    /// concurrently is either in that snapshot or notified afterwards.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(PerformanceMetrics) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let (subscription, initial) = {
            let guard = self.shared.metrics.lock().unwrap_or_else(|e| e.into_inner());
            let registered = Arc::clone(&callback);
            let subscription = self
                .shared
                .subscribers
                .subscribe(move |metrics: &PerformanceMetrics| registered(*metrics));
            (subscription, *guard)
        };

        callback(initial);
        subscription
    }

    /// Feed a sample through the rounding and change check.
    ///
    /// Returns true when the stored value changed and subscribers were
    /// notified.
    pub fn record(&self, sample: Sample) -> bool {
        self.shared.record(sample)
    }

    /// Copy of the current snapshot.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.shared.snapshot()
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        self.shared.snapshot().get(kind)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }
}

impl Drop for MetricsService {
    fn drop(&mut self) {
        for timer in &self.timers {
            timer.cancel();
        }
    }
}

/// Hook the shared state up to the browsing context. Callbacks hold weak
/// references so the context never keeps a dropped service alive.
fn wire(
    shared: &Arc<Shared>,
    context: &Arc<dyn BrowsingContext>,
    config: &MetricsConfig,
) -> Vec<TimerHandle> {
    for (signal, reporting) in OBSERVED_SIGNALS {
        let weak = Arc::downgrade(shared);
        let kind = MetricKind::from(signal);
        context.observe(
            signal,
            reporting,
            Arc::new(move |value| {
                if let Some(shared) = weak.upgrade() {
                    shared.record(Sample::new(kind, value));
                }
            }),
        );
    }

    let weak = Arc::downgrade(shared);
    let clock: Weak<dyn BrowsingContext> = Arc::downgrade(context);
    let ticker = context.set_interval(
        config.processing_interval,
        Box::new(move || {
            if let (Some(shared), Some(clock)) = (weak.upgrade(), clock.upgrade()) {
                let elapsed = clock.now_ms() - shared.start_ms;
                shared.record(Sample::processing_time(elapsed));
            }
        }),
    );

    let weak = Arc::downgrade(shared);
    let timeline: Weak<dyn BrowsingContext> = Arc::downgrade(context);
    let script_suffix = config.script_suffix.clone();
    let probe = context.set_timeout(
        config.bundle_probe_delay,
        Box::new(move || {
            if let (Some(shared), Some(timeline)) = (weak.upgrade(), timeline.upgrade()) {
                shared.probe_bundle(&timeline.resource_entries(), &script_suffix);
            }
        }),
    );

    tracing::debug!(
        interval = ?config.processing_interval,
        probe_delay = ?config.bundle_probe_delay,
        "performance observation wired"
    );

    vec![ticker, probe]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_script_bundle_kb() {
        let entries = vec![
            ResourceTiming::new("https://shop.example/_next/main.js", Some(2048)),
            ResourceTiming::new("https://shop.example/_next/page.js", None),
            ResourceTiming::new("https://shop.example/styles.css", Some(4096)),
            ResourceTiming::new("https://shop.example/chunk.js", Some(1024)),
        ];
        assert_eq!(script_bundle_kb(&entries, ".js"), 3.0);
        assert_eq!(script_bundle_kb(&[], ".js"), 0.0);
    }

    #[test]
    fn test_script_bundle_kb_saturates() {
        let entries = vec![
            ResourceTiming::new("a.js", Some(u64::MAX)),
            ResourceTiming::new("b.js", Some(u64::MAX)),
        ];
        assert_eq!(script_bundle_kb(&entries, ".js"), u64::MAX as f64 / 1024.0);
    }

    #[test]
    fn test_headless_service_records_without_wiring() {
        let service = MetricsService::new(&Environment::headless());
        assert!(service.timers.is_empty());
        assert!(service.record(Sample::lcp(900.2)));
        assert_eq!(service.get(MetricKind::Lcp), 900.0);
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let service = MetricsService::new(&Environment::headless());
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let _sub = service.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Initial delivery
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(!service.record(Sample::inp(0.3)));
        assert!(service.record(Sample::inp(48.0)));
        assert!(!service.record(Sample::inp(48.2)));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_probe_runs_once() {
        let service = MetricsService::new(&Environment::headless());
        let entries = vec![ResourceTiming::new("a.js", Some(10 * 1024))];
        service.shared.probe_bundle(&entries, ".js");

        let more = vec![
            ResourceTiming::new("a.js", Some(10 * 1024)),
            ResourceTiming::new("b.js", Some(30 * 1024)),
        ];
        service.shared.probe_bundle(&more, ".js");
        assert_eq!(service.get(MetricKind::BundleSize), 10.0);
    }
}
