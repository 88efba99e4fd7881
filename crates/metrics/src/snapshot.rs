//! Display-ready performance snapshot.

use crate::sample::{MetricKind, Unit};
use serde::{Deserialize, Serialize};

/// LCP below this is rated optimal.
pub const LCP_GOOD_THRESHOLD_MS: f64 = 2500.0;

/// Snapshot of every tracked metric.
///
/// Consumers always receive copies; the aggregator's own record is never
/// handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Largest contentful paint (ms).
    pub lcp: f64,
    /// Cumulative layout shift (unitless).
    pub cls: f64,
    /// Interaction to next paint (ms).
    pub inp: f64,
    /// Time to first byte (ms).
    pub ttfb: f64,
    /// Transferred script bytes (KB).
    pub bundle_size: f64,
    /// Elapsed time since the aggregator started (ms).
    pub processing_time: f64,
}

/// Traffic-light rating shown next to LCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LcpStatus {
    /// No paint observed yet.
    Calculating,
    Optimal,
    NeedsReview,
}

impl LcpStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LcpStatus::Calculating => "Calculating...",
            LcpStatus::Optimal => "Optimal",
            LcpStatus::NeedsReview => "Needs Review",
        }
    }
}

impl PerformanceMetrics {
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Lcp => self.lcp,
            MetricKind::Cls => self.cls,
            MetricKind::Inp => self.inp,
            MetricKind::Ttfb => self.ttfb,
            MetricKind::BundleSize => self.bundle_size,
            MetricKind::ProcessingTime => self.processing_time,
        }
    }

    pub(crate) fn set(&mut self, kind: MetricKind, value: f64) {
        let field = match kind {
            MetricKind::Lcp => &mut self.lcp,
            MetricKind::Cls => &mut self.cls,
            MetricKind::Inp => &mut self.inp,
            MetricKind::Ttfb => &mut self.ttfb,
            MetricKind::BundleSize => &mut self.bundle_size,
            MetricKind::ProcessingTime => &mut self.processing_time,
        };
        *field = value;
    }

    /// Formatted value with unit, e.g. "1200ms", "0.0123", "85KB".
    pub fn display(&self, kind: MetricKind) -> String {
        let value = self.get(kind);
        match kind.unit() {
            Unit::Milliseconds => format!("{value:.0}ms"),
            Unit::Unitless => format!("{value:.4}"),
            Unit::Kilobytes => format!("{value:.0}KB"),
        }
    }

    /// Processing time in seconds with two decimals, as the footer shows it.
    pub fn processing_time_secs(&self) -> String {
        format!("{:.2}s", self.processing_time / 1000.0)
    }

    pub fn lcp_is_good(&self) -> bool {
        self.lcp > 0.0 && self.lcp < LCP_GOOD_THRESHOLD_MS
    }

    pub fn lcp_status(&self) -> LcpStatus {
        if self.lcp_is_good() {
            LcpStatus::Optimal
        } else if self.lcp == 0.0 {
            LcpStatus::Calculating
        } else {
            LcpStatus::NeedsReview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_uses_camel_case() {
        let metrics = PerformanceMetrics {
            bundle_size: 42.0,
            processing_time: 1500.0,
            ..Default::default()
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["bundleSize"], 42.0);
        assert_eq!(json["processingTime"], 1500.0);
        assert_eq!(json["lcp"], 0.0);
    }

    #[test]
    fn test_display_formats() {
        let metrics = PerformanceMetrics {
            lcp: 1201.0,
            cls: 0.0100001,
            bundle_size: 85.0,
            processing_time: 2340.0,
            ..Default::default()
        };
        assert_eq!(metrics.display(MetricKind::Lcp), "1201ms");
        assert_eq!(metrics.display(MetricKind::Cls), "0.0100");
        assert_eq!(metrics.display(MetricKind::BundleSize), "85KB");
        assert_eq!(metrics.processing_time_secs(), "2.34s");
    }

    #[test]
    fn test_lcp_status() {
        let mut metrics = PerformanceMetrics::default();
        assert_eq!(metrics.lcp_status(), LcpStatus::Calculating);

        metrics.lcp = 1800.0;
        assert_eq!(metrics.lcp_status(), LcpStatus::Optimal);

        metrics.lcp = 2500.0;
        assert_eq!(metrics.lcp_status(), LcpStatus::NeedsReview);
        assert_eq!(metrics.lcp_status().label(), "Needs Review");
    }

    #[test]
    fn test_get_set_every_kind() {
        let mut metrics = PerformanceMetrics::default();
        for (i, kind) in MetricKind::ALL.iter().enumerate() {
            metrics.set(*kind, i as f64 + 1.0);
        }
        for (i, kind) in MetricKind::ALL.iter().enumerate() {
            assert_eq!(metrics.get(*kind), i as f64 + 1.0);
        }
    }
}
