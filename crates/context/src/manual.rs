//! Deterministic browsing context driven by hand.
//!
//! Time only moves when [`ManualBrowsingContext::advance`] is called, and
//! samples arrive only through [`ManualBrowsingContext::report`]. Everything
//! runs on the caller's thread, which makes it suitable for tests and for
//! replaying recorded traces.

use crate::provider::{
    BrowsingContext, IntervalTask, ObserverSet, Reporting, SampleSink, Signal, TimeoutTask,
};
use crate::resource::ResourceTiming;
use crate::timer::TimerHandle;
use std::sync::Mutex;
use std::time::Duration;

/// Shortest interval period; a zero period would never let the clock advance.
const MIN_INTERVAL_MS: f64 = 1.0;

fn duration_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

enum Task {
    Interval(IntervalTask),
    Timeout(TimeoutTask),
}

struct PendingTimer {
    seq: u64,
    due_ms: f64,
    period_ms: f64,
    task: Task,
    handle: TimerHandle,
}

#[derive(Default)]
struct Timers {
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

/// Hand-driven [`BrowsingContext`].
#[derive(Default)]
pub struct ManualBrowsingContext {
    now_ms: Mutex<f64>,
    timers: Mutex<Timers>,
    observers: ObserverSet,
    resources: Mutex<Vec<ResourceTiming>>,
}

impl ManualBrowsingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule(&self, delay_ms: f64, period_ms: f64, task: Task) -> TimerHandle {
        let handle = TimerHandle::new();
        let due_ms = self.now_ms() + delay_ms;
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        let seq = timers.next_seq;
        timers.next_seq += 1;
        timers.pending.push(PendingTimer {
            seq,
            due_ms,
            period_ms,
            task,
            handle: handle.clone(),
        });
        handle
    }

    /// Remove the earliest live timer due at or before `limit_ms`.
    fn pop_due(&self, limit_ms: f64) -> Option<PendingTimer> {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        timers.pending.retain(|t| !t.handle.is_cancelled());
        let index = timers
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= limit_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        Some(timers.pending.swap_remove(index))
    }

    /// Move the clock forward, firing every timer that falls due on the way
    /// in due-time order. Timers run without any internal lock held.
    pub fn advance(&self, by: Duration) {
        let target = self.now_ms() + duration_ms(by);

        while let Some(timer) = self.pop_due(target) {
            self.set_now(timer.due_ms);
            match timer.task {
                Task::Timeout(task) => task(),
                Task::Interval(mut task) => {
                    task();
                    if !timer.handle.is_cancelled() {
                        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
                        let seq = timers.next_seq;
                        timers.next_seq += 1;
                        timers.pending.push(PendingTimer {
                            seq,
                            due_ms: timer.due_ms + timer.period_ms,
                            period_ms: timer.period_ms,
                            task: Task::Interval(task),
                            handle: timer.handle,
                        });
                    }
                }
            }
        }

        self.set_now(target);
    }

    fn set_now(&self, now_ms: f64) {
        *self.now_ms.lock().unwrap_or_else(|e| e.into_inner()) = now_ms;
    }

    /// Deliver a raw sample to the observers of `signal`.
    pub fn report(&self, signal: Signal, value: f64, is_final: bool) {
        for sink in self.observers.take_sinks(signal, is_final) {
            sink(value);
        }
    }

    /// Append an entry to the resource timeline.
    pub fn push_resource(&self, entry: ResourceTiming) {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    /// Number of observers registered for `signal`.
    pub fn observer_count(&self, signal: Signal) -> usize {
        self.observers.count(signal)
    }

    /// Number of timers that have not fired (one-shot) or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pending
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }
}

impl BrowsingContext for ManualBrowsingContext {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn observe(&self, signal: Signal, reporting: Reporting, sink: SampleSink) {
        self.observers.register(signal, reporting, sink);
    }

    fn set_interval(&self, period: Duration, task: IntervalTask) -> TimerHandle {
        let period_ms = duration_ms(period).max(MIN_INTERVAL_MS);
        self.schedule(period_ms, period_ms, Task::Interval(task))
    }

    fn set_timeout(&self, delay: Duration, task: TimeoutTask) -> TimerHandle {
        self.schedule(duration_ms(delay), 0.0, Task::Timeout(task))
    }

    fn resource_entries(&self) -> Vec<ResourceTiming> {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_interval_fires_each_period() {
        let ctx = ManualBrowsingContext::new();
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let ticks_clone = Arc::clone(&ticks);
        let ctx = Arc::new(ctx);
        let ctx_clone = Arc::clone(&ctx);

        ctx.set_interval(
            Duration::from_millis(100),
            Box::new(move || ticks_clone.lock().unwrap().push(ctx_clone.now_ms())),
        );

        ctx.advance(Duration::from_millis(350));
        assert_eq!(*ticks.lock().unwrap(), vec![100.0, 200.0, 300.0]);
        assert_eq!(ctx.now_ms(), 350.0);
    }

    #[test]
    fn test_timeout_fires_once() {
        let ctx = ManualBrowsingContext::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);

        ctx.set_timeout(
            Duration::from_millis(2000),
            Box::new(move || log_clone.lock().unwrap().push("probe")),
        );
        assert_eq!(ctx.pending_timers(), 1);

        ctx.advance(Duration::from_millis(1999));
        assert!(log.lock().unwrap().is_empty());

        ctx.advance(Duration::from_millis(5000));
        assert_eq!(*log.lock().unwrap(), vec!["probe"]);
        assert_eq!(ctx.pending_timers(), 0);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let ctx = ManualBrowsingContext::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let l1 = Arc::clone(&log);
        ctx.set_timeout(Duration::from_millis(250), Box::new(move || l1.lock().unwrap().push("timeout")));
        let l2 = Arc::clone(&log);
        ctx.set_interval(Duration::from_millis(100), Box::new(move || l2.lock().unwrap().push("tick")));

        ctx.advance(Duration::from_millis(300));
        assert_eq!(*log.lock().unwrap(), vec!["tick", "tick", "timeout", "tick"]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let ctx = ManualBrowsingContext::new();
        let log = Arc::new(Mutex::new(Vec::<&str>::new()));
        let l1 = Arc::clone(&log);

        let handle = ctx.set_timeout(Duration::from_millis(10), Box::new(move || l1.lock().unwrap().push("fired")));
        handle.cancel();

        ctx.advance(Duration::from_millis(100));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_report_reaches_observers() {
        let ctx = ManualBrowsingContext::new();
        let values = Arc::new(Mutex::new(Vec::new()));
        let v = Arc::clone(&values);
        ctx.observe(
            Signal::LargestContentfulPaint,
            Reporting::AllChanges,
            Arc::new(move |value| v.lock().unwrap().push(value)),
        );

        ctx.report(Signal::LargestContentfulPaint, 800.0, false);
        ctx.report(Signal::InteractionToNextPaint, 40.0, false);
        ctx.report(Signal::LargestContentfulPaint, 1200.0, true);

        assert_eq!(*values.lock().unwrap(), vec![800.0, 1200.0]);
        assert_eq!(ctx.observer_count(Signal::LargestContentfulPaint), 1);
    }

    #[test]
    fn test_resource_entries_snapshot() {
        let ctx = ManualBrowsingContext::new();
        ctx.push_resource(ResourceTiming::new("a.js", Some(1024)));
        let entries = ctx.resource_entries();
        ctx.push_resource(ResourceTiming::new("b.js", Some(2048)));

        assert_eq!(entries.len(), 1);
        assert_eq!(ctx.resource_entries().len(), 2);
    }
}
