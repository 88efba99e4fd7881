//! Provider traits for the host environment.
//!
//! These traits abstract the browsing context (clock, timers, performance
//! observation) so the telemetry and mode logic stays testable without a
//! real browser or event loop.

use crate::resource::ResourceTiming;
use crate::timer::TimerHandle;
use rivo_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Performance signal a browsing context can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "lcp")]
    LargestContentfulPaint,
    #[serde(rename = "cls")]
    CumulativeLayoutShift,
    #[serde(rename = "inp")]
    InteractionToNextPaint,
    #[serde(rename = "ttfb")]
    TimeToFirstByte,
}

/// How often an observer wants to hear about a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    /// Every intermediate value.
    AllChanges,
    /// Only the terminal value, once.
    Final,
}

/// Receives raw sample values for one signal.
pub type SampleSink = Arc<dyn Fn(f64) + Send + Sync + 'static>;

/// Repeating timer body.
pub type IntervalTask = Box<dyn FnMut() + Send + 'static>;

/// One-shot timer body.
pub type TimeoutTask = Box<dyn FnOnce() + Send + 'static>;

/// Interactive host capable of timing, scheduling and observing performance.
///
/// Implementations must deliver timer ticks and samples sequentially, never
/// running two of them at the same time.
pub trait BrowsingContext: Send + Sync {
    /// Milliseconds since the context's time origin.
    fn now_ms(&self) -> f64;

    /// Register a sink for a performance signal.
    fn observe(&self, signal: Signal, reporting: Reporting, sink: SampleSink);

    /// Run `task` every `period` until the handle is cancelled.
    fn set_interval(&self, period: Duration, task: IntervalTask) -> TimerHandle;

    /// Run `task` once after `delay` unless the handle is cancelled first.
    fn set_timeout(&self, delay: Duration, task: TimeoutTask) -> TimerHandle;

    /// Resource-load entries recorded so far.
    fn resource_entries(&self) -> Vec<ResourceTiming>;
}

/// Handle to everything the host environment may or may not provide.
///
/// A headless environment has neither a browsing context nor durable
/// storage; components built on it skip observation and keep state in memory.
#[derive(Clone, Default)]
pub struct Environment {
    browsing_context: Option<Arc<dyn BrowsingContext>>,
    durable_store: Option<Arc<dyn KeyValueStore>>,
}

impl Environment {
    /// Null environment for non-interactive execution.
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn new(browsing_context: Arc<dyn BrowsingContext>) -> Self {
        Self {
            browsing_context: Some(browsing_context),
            durable_store: None,
        }
    }

    pub fn with_browsing_context(mut self, browsing_context: Arc<dyn BrowsingContext>) -> Self {
        self.browsing_context = Some(browsing_context);
        self
    }

    pub fn with_durable_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.durable_store = Some(store);
        self
    }

    pub fn browsing_context(&self) -> Option<&Arc<dyn BrowsingContext>> {
        self.browsing_context.as_ref()
    }

    pub fn durable_store(&self) -> Option<&Arc<dyn KeyValueStore>> {
        self.durable_store.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.browsing_context.is_some()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("browsing_context", &self.browsing_context.is_some())
            .field("durable_store", &self.durable_store.is_some())
            .finish()
    }
}

struct Observer {
    signal: Signal,
    reporting: Reporting,
    sink: SampleSink,
    final_delivered: bool,
}

/// Registered observers shared by the browsing-context implementations.
#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: Mutex<Vec<Observer>>,
}

impl ObserverSet {
    pub(crate) fn register(&self, signal: Signal, reporting: Reporting, sink: SampleSink) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Observer {
                signal,
                reporting,
                sink,
                final_delivered: false,
            });
    }

    /// Sinks that should receive this sample. `Final` observers are marked
    /// delivered so they never see a second terminal value.
    pub(crate) fn take_sinks(&self, signal: Signal, is_final: bool) -> Vec<SampleSink> {
        let mut observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
        observers
            .iter_mut()
            .filter(|o| o.signal == signal)
            .filter_map(|o| match o.reporting {
                Reporting::AllChanges => Some(Arc::clone(&o.sink)),
                Reporting::Final if is_final && !o.final_delivered => {
                    o.final_delivered = true;
                    Some(Arc::clone(&o.sink))
                }
                Reporting::Final => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, signal: Signal) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|o| o.signal == signal)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_sink(count: &Arc<AtomicUsize>) -> SampleSink {
        let count = Arc::clone(count);
        Arc::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_headless_environment() {
        let env = Environment::headless();
        assert!(!env.is_interactive());
        assert!(env.browsing_context().is_none());
        assert!(env.durable_store().is_none());
    }

    #[test]
    fn test_environment_with_store() {
        let env = Environment::headless()
            .with_durable_store(Arc::new(rivo_storage::MemoryStore::new()));
        assert!(!env.is_interactive());
        assert!(env.durable_store().is_some());
    }

    #[test]
    fn test_final_observer_gets_one_sample() {
        let set = ObserverSet::default();
        let count = Arc::new(AtomicUsize::new(0));
        set.register(Signal::TimeToFirstByte, Reporting::Final, counting_sink(&count));

        assert!(set.take_sinks(Signal::TimeToFirstByte, false).is_empty());
        assert_eq!(set.take_sinks(Signal::TimeToFirstByte, true).len(), 1);
        assert!(set.take_sinks(Signal::TimeToFirstByte, true).is_empty());
    }

    #[test]
    fn test_all_changes_observer_gets_every_sample() {
        let set = ObserverSet::default();
        let count = Arc::new(AtomicUsize::new(0));
        set.register(
            Signal::CumulativeLayoutShift,
            Reporting::AllChanges,
            counting_sink(&count),
        );

        assert_eq!(set.take_sinks(Signal::CumulativeLayoutShift, false).len(), 1);
        assert_eq!(set.take_sinks(Signal::CumulativeLayoutShift, true).len(), 1);
        assert!(set.take_sinks(Signal::LargestContentfulPaint, false).is_empty());
        assert_eq!(set.count(Signal::CumulativeLayoutShift), 1);
    }

    #[test]
    fn test_signal_serde_names() {
        let signals: Vec<Signal> = serde_json::from_str(r#"["lcp","cls","inp","ttfb"]"#).unwrap();
        assert_eq!(
            signals,
            vec![
                Signal::LargestContentfulPaint,
                Signal::CumulativeLayoutShift,
                Signal::InteractionToNextPaint,
                Signal::TimeToFirstByte,
            ]
        );
    }
}
