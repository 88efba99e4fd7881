//! Performance telemetry for the storefront.
//!
//! Collects paint, layout-shift, interaction and first-byte signals plus
//! elapsed processing time and transferred script size, and republishes a
//! deduplicated [`PerformanceMetrics`] snapshot to any number of subscribers.
//!
//! Subscribers are notified only when a normalized value actually changes:
//! every field except `cls` is rounded to the nearest integer before the
//! comparison, `cls` keeps full precision.

mod sample;
mod service;
mod snapshot;

pub use sample::{MetricKind, Rounding, Sample, Unit};
pub use service::{
    script_bundle_kb, MetricsConfig, MetricsService, DEFAULT_BUNDLE_PROBE_DELAY,
    DEFAULT_PROCESSING_INTERVAL,
};
pub use snapshot::{LcpStatus, PerformanceMetrics, LCP_GOOD_THRESHOLD_MS};

pub use rivo_bus::Subscription;
