//! Resource-load timing entries.

use serde::{Deserialize, Serialize};

/// One entry of the resource timeline (scripts, stylesheets, images, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTiming {
    /// Resource URL.
    pub name: String,

    /// Bytes transferred over the network; `None` for cross-origin entries
    /// without timing headers or cache hits that report nothing.
    #[serde(default)]
    pub transfer_size: Option<u64>,
}

impl ResourceTiming {
    pub fn new(name: impl Into<String>, transfer_size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            transfer_size,
        }
    }

    /// Whether the URL ends with `suffix` (e.g. ".js").
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.name.ends_with(suffix)
    }

    /// Transferred bytes, treating a missing size as zero.
    pub fn transferred_bytes(&self) -> u64 {
        self.transfer_size.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_transfer_size_is_zero() {
        let entry = ResourceTiming::new("https://cdn.example/app.js", None);
        assert_eq!(entry.transferred_bytes(), 0);
        assert!(entry.has_suffix(".js"));
    }

    #[test]
    fn test_browser_entry_fields_are_ignored() {
        let json = r#"{"name": "https://cdn.example/app.js", "initiatorType": "script", "transfer_size": 300}"#;
        let entry: ResourceTiming = serde_json::from_str(json).unwrap();
        assert_eq!(entry, ResourceTiming::new("https://cdn.example/app.js", Some(300)));
    }

    #[test]
    fn test_suffix_match_is_exact() {
        let entry = ResourceTiming::new("https://cdn.example/app.js?v=2", Some(10));
        assert!(!entry.has_suffix(".js"));
    }
}
