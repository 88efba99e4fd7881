//! Metric kinds and raw samples.
//!
//! Pure domain logic - no I/O, no timers.

use rivo_context::Signal;
use serde::{Deserialize, Serialize};

/// The six fields of [`crate::PerformanceMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Lcp,
    Cls,
    Inp,
    Ttfb,
    BundleSize,
    ProcessingTime,
}

/// Unit a metric is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Milliseconds,
    Unitless,
    Kilobytes,
}

/// Normalization applied to a raw value before the change comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    NearestInteger,
    FullPrecision,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Lcp,
        MetricKind::Cls,
        MetricKind::Inp,
        MetricKind::Ttfb,
        MetricKind::BundleSize,
        MetricKind::ProcessingTime,
    ];

    pub fn unit(&self) -> Unit {
        match self {
            MetricKind::Lcp | MetricKind::Inp | MetricKind::Ttfb | MetricKind::ProcessingTime => {
                Unit::Milliseconds
            }
            MetricKind::Cls => Unit::Unitless,
            MetricKind::BundleSize => Unit::Kilobytes,
        }
    }

    /// Layout shift is a small fraction, so it keeps full precision;
    /// everything else is compared as whole numbers.
    pub fn rounding(&self) -> Rounding {
        match self {
            MetricKind::Cls => Rounding::FullPrecision,
            _ => Rounding::NearestInteger,
        }
    }

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Lcp => "LCP",
            MetricKind::Cls => "CLS",
            MetricKind::Inp => "INP",
            MetricKind::Ttfb => "TTFB",
            MetricKind::BundleSize => "Bundle Size",
            MetricKind::ProcessingTime => "Processing Time",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Signal> for MetricKind {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::LargestContentfulPaint => MetricKind::Lcp,
            Signal::CumulativeLayoutShift => MetricKind::Cls,
            Signal::InteractionToNextPaint => MetricKind::Inp,
            Signal::TimeToFirstByte => MetricKind::Ttfb,
        }
    }
}

/// One raw observation for a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub kind: MetricKind,
    pub value: f64,
}

impl Sample {
    pub fn new(kind: MetricKind, value: f64) -> Self {
        Self { kind, value }
    }

    pub fn lcp(ms: f64) -> Self {
        Self::new(MetricKind::Lcp, ms)
    }

    pub fn cls(shift: f64) -> Self {
        Self::new(MetricKind::Cls, shift)
    }

    pub fn inp(ms: f64) -> Self {
        Self::new(MetricKind::Inp, ms)
    }

    pub fn ttfb(ms: f64) -> Self {
        Self::new(MetricKind::Ttfb, ms)
    }

    pub fn bundle_size(kb: f64) -> Self {
        Self::new(MetricKind::BundleSize, kb)
    }

    pub fn processing_time(ms: f64) -> Self {
        Self::new(MetricKind::ProcessingTime, ms)
    }

    /// Value as it would be stored, or `None` for NaN/infinite input.
    /// Negative values clamp to zero.
    pub fn normalized(&self) -> Option<f64> {
        if !self.value.is_finite() {
            return None;
        }
        let value = self.value.max(0.0);
        Some(match self.kind.rounding() {
            Rounding::NearestInteger => value.round(),
            Rounding::FullPrecision => value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rounding() {
        assert_eq!(Sample::lcp(1200.4).normalized(), Some(1200.0));
        assert_eq!(Sample::lcp(1200.5).normalized(), Some(1201.0));
        assert_eq!(Sample::lcp(1200.6).normalized(), Some(1201.0));
        assert_eq!(Sample::bundle_size(12.49).normalized(), Some(12.0));
    }

    #[test]
    fn test_cls_keeps_precision() {
        assert_eq!(Sample::cls(0.0100001).normalized(), Some(0.0100001));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(Sample::inp(f64::NAN).normalized(), None);
        assert_eq!(Sample::inp(f64::INFINITY).normalized(), None);
        assert_eq!(Sample::ttfb(-5.0).normalized(), Some(0.0));
    }

    #[test]
    fn test_signal_mapping() {
        assert_eq!(MetricKind::from(Signal::LargestContentfulPaint), MetricKind::Lcp);
        assert_eq!(MetricKind::from(Signal::CumulativeLayoutShift), MetricKind::Cls);
        assert_eq!(MetricKind::from(Signal::InteractionToNextPaint), MetricKind::Inp);
        assert_eq!(MetricKind::from(Signal::TimeToFirstByte), MetricKind::Ttfb);
    }

    #[test]
    fn test_units() {
        assert_eq!(MetricKind::Cls.unit(), Unit::Unitless);
        assert_eq!(MetricKind::BundleSize.unit(), Unit::Kilobytes);
        assert!(MetricKind::ALL
            .iter()
            .filter(|k| k.rounding() == Rounding::FullPrecision)
            .eq([MetricKind::Cls].iter()));
    }
}
