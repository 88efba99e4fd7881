//! Event contracts for what mounted views report.
//!
//! This crate defines the payloads (DTOs) views publish when metrics change,
//! when the cache mode flips and when a data load finishes. Using shared
//! types keeps producers and renderers agreeing on field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{
    emit_event, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus,
    TracingEventBus,
};

use rivo_metrics::PerformanceMetrics;
use rivo_mode::CacheMode;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, used to stamp events.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Emitted when a mounted view receives a new metrics snapshot.
///
/// Producers: views (metrics subscription)
/// Consumers: renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsUpdatedEvent {
    /// Name of the view that received the snapshot.
    pub view: String,
    pub metrics: PerformanceMetrics,
    /// Human-readable LCP assessment.
    pub lcp_status: String,
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Emitted when a mounted view learns the cache mode changed.
///
/// Producers: views (mode subscription)
/// Consumers: renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheModeChangedEvent {
    pub view: String,
    pub enabled: bool,
    pub mode: CacheMode,
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Emitted when a view's data load succeeds.
///
/// Producers: catalog loader
/// Consumers: renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewLoadedEvent {
    pub view: String,
    /// Mode the request was issued with.
    pub mode: CacheMode,
    /// Number of items (products or categories) received.
    pub items: usize,
    /// Wall-clock time of the request.
    pub elapsed_ms: u64,
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Emitted when a view's data load fails.
///
/// Producers: catalog loader
/// Consumers: renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewLoadFailedEvent {
    pub view: String,
    pub mode: CacheMode,
    pub error: String,
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const METRICS_UPDATED: &str = "metrics:updated";
    pub const CACHE_MODE_CHANGED: &str = "cache_mode:changed";
    pub const VIEW_LOADED: &str = "view:loaded";
    pub const VIEW_LOAD_FAILED: &str = "view:load_failed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_event_uses_camel_case_snapshot() {
        let event = MetricsUpdatedEvent {
            view: "home".to_string(),
            metrics: PerformanceMetrics {
                bundle_size: 40.0,
                ..Default::default()
            },
            lcp_status: "Calculating...".to_string(),
            timestamp_ms: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["metrics"]["bundleSize"], 40.0);
        assert_eq!(json["view"], "home");
    }

    #[test]
    fn test_mode_event_deserialize_minimal() {
        let json = r#"{"view": "header", "enabled": true, "mode": "on"}"#;
        let event: CacheModeChangedEvent = serde_json::from_str(json).unwrap();
        assert!(event.enabled);
        assert_eq!(event.mode, CacheMode::On);
        assert_eq!(event.timestamp_ms, 0);
    }

    #[test]
    fn test_now_ms_is_positive() {
        assert!(now_ms() > 0);
    }
}
