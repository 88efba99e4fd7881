//! Recorded performance traces.
//!
//! A trace is a JSON-lines file. Each line is either a signal sample
//!
//! ```json
//! {"at_ms": 640, "signal": "lcp", "value": 1180.7, "final": false}
//! ```
//!
//! or a resource timing entry
//!
//! ```json
//! {"at_ms": 900, "resource": {"name": "https://shop.example/app.js", "transfer_size": 40960}}
//! ```
//!
//! `at_ms` is relative to the start of the replay.

use crate::error::{BenchError, Result};
use rivo_context::{BrowsingContext, LoopContext, ManualBrowsingContext, ResourceTiming, Signal};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceEvent {
    Sample {
        at_ms: f64,
        signal: Signal,
        value: f64,
        #[serde(rename = "final", default)]
        is_final: bool,
    },
    Resource {
        at_ms: f64,
        resource: ResourceTiming,
    },
}

impl TraceEvent {
    pub fn at_ms(&self) -> f64 {
        match self {
            TraceEvent::Sample { at_ms, .. } | TraceEvent::Resource { at_ms, .. } => *at_ms,
        }
    }
}

/// Latest offset a trace may use, one day.
pub const MAX_TRACE_OFFSET_MS: f64 = 86_400_000.0;

/// Parse a trace, skipping blank lines, ordered by `at_ms`.
///
/// Events sharing a timestamp keep their file order.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: TraceEvent = serde_json::from_str(line).map_err(|e| BenchError::Trace {
            line: index + 1,
            message: e.to_string(),
        })?;

        let at_ms = event.at_ms();
        if !(0.0..=MAX_TRACE_OFFSET_MS).contains(&at_ms) {
            return Err(BenchError::Trace {
                line: index + 1,
                message: format!(
                    "at_ms must be between 0 and {}, got {}",
                    MAX_TRACE_OFFSET_MS, at_ms
                ),
            });
        }
        events.push(event);
    }

    events.sort_by(|a, b| a.at_ms().total_cmp(&b.at_ms()));
    Ok(events)
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceEvent>> {
    let file = std::fs::File::open(path)?;
    parse_trace(std::io::BufReader::new(file))
}

/// Where a trace is replayed.
pub trait TraceTarget {
    fn now_ms(&self) -> f64;

    /// Let time pass until `at_ms` on this target's clock.
    fn wait_until(&self, at_ms: f64);

    fn report(&self, signal: Signal, value: f64, is_final: bool);

    fn record_resource(&self, entry: ResourceTiming);
}

impl TraceTarget for LoopContext {
    fn now_ms(&self) -> f64 {
        BrowsingContext::now_ms(self)
    }

    fn wait_until(&self, at_ms: f64) {
        let remaining = at_ms - BrowsingContext::now_ms(self);
        if remaining <= 0.0 {
            return;
        }
        match Duration::try_from_secs_f64(remaining / 1000.0) {
            Ok(wait) => std::thread::sleep(wait),
            Err(e) => tracing::warn!(at_ms, error = %e, "unreachable trace offset, not waiting"),
        }
    }

    fn report(&self, signal: Signal, value: f64, is_final: bool) {
        if !LoopContext::report(self, signal, value, is_final) {
            tracing::warn!(?signal, "event loop stopped, sample dropped");
        }
    }

    fn record_resource(&self, entry: ResourceTiming) {
        LoopContext::record_resource(self, entry);
    }
}

impl TraceTarget for ManualBrowsingContext {
    fn now_ms(&self) -> f64 {
        BrowsingContext::now_ms(self)
    }

    fn wait_until(&self, at_ms: f64) {
        let remaining = at_ms - BrowsingContext::now_ms(self);
        if remaining > 0.0 && remaining <= MAX_TRACE_OFFSET_MS {
            self.advance(Duration::from_nanos((remaining * 1_000_000.0).round() as u64));
        }
    }

    fn report(&self, signal: Signal, value: f64, is_final: bool) {
        ManualBrowsingContext::report(self, signal, value, is_final);
    }

    fn record_resource(&self, entry: ResourceTiming) {
        self.push_resource(entry);
    }
}

/// Feed `events` to `target` at their offsets from now. Returns the number
/// of events replayed.
pub fn replay(events: &[TraceEvent], target: &dyn TraceTarget) -> usize {
    let origin = target.now_ms();

    for event in events {
        target.wait_until(origin + event.at_ms());
        match event {
            TraceEvent::Sample {
                signal,
                value,
                is_final,
                ..
            } => target.report(*signal, *value, *is_final),
            TraceEvent::Resource { resource, .. } => target.record_resource(resource.clone()),
        }
    }

    events.len()
}
