//! Cache mode definition and its persisted form.
//!
//! Pure domain logic - no I/O.

use serde::{Deserialize, Serialize};

/// Storage key holding the persisted flag.
pub const REDIS_ENABLED_KEY: &str = "redis_enabled";

/// Whether outbound data requests ask for the server-side cached path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    #[default]
    Off,
    On,
}

impl CacheMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, CacheMode::On)
    }

    /// Label shown next to the toggle.
    pub fn label(&self) -> &'static str {
        match self {
            CacheMode::Off => "OFF",
            CacheMode::On => "ON",
        }
    }

    /// Canonical persisted string, "true" or "false".
    pub fn as_flag_str(&self) -> &'static str {
        match self {
            CacheMode::Off => "false",
            CacheMode::On => "true",
        }
    }

    /// Parse a persisted value. Anything other than exactly "true" is off.
    pub fn from_flag_str(value: &str) -> Self {
        if value == "true" {
            CacheMode::On
        } else {
            CacheMode::Off
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            CacheMode::Off => CacheMode::On,
            CacheMode::On => CacheMode::Off,
        }
    }
}

impl From<bool> for CacheMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            CacheMode::On
        } else {
            CacheMode::Off
        }
    }
}

impl From<CacheMode> for bool {
    fn from(mode: CacheMode) -> Self {
        mode.is_enabled()
    }
}

impl std::fmt::Display for CacheMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_strings() {
        assert_eq!(CacheMode::On.as_flag_str(), "true");
        assert_eq!(CacheMode::Off.as_flag_str(), "false");
        assert_eq!(CacheMode::from_flag_str("true"), CacheMode::On);
        assert_eq!(CacheMode::from_flag_str("false"), CacheMode::Off);
    }

    #[test]
    fn test_non_canonical_values_are_off() {
        assert_eq!(CacheMode::from_flag_str("TRUE"), CacheMode::Off);
        assert_eq!(CacheMode::from_flag_str("1"), CacheMode::Off);
        assert_eq!(CacheMode::from_flag_str(""), CacheMode::Off);
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(CacheMode::from(true), CacheMode::On);
        assert!(!bool::from(CacheMode::Off));
        assert_eq!(CacheMode::On.flipped(), CacheMode::Off);
        assert_eq!(CacheMode::default(), CacheMode::Off);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CacheMode::On.to_string(), "ON");
        assert_eq!(CacheMode::Off.label(), "OFF");
    }
}
