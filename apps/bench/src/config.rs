//! Bench configuration: JSON file overlaid with command-line flags.

use crate::args::Cli;
use crate::error::{BenchError, Result};
use rivo_catalog::CatalogConfig;
use rivo_metrics::{MetricsConfig, DEFAULT_BUNDLE_PROBE_DELAY, DEFAULT_PROCESSING_INTERVAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DURATION_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// SQLite file for the persisted cache mode. Falls back to the user
    /// data directory.
    pub store_path: Option<PathBuf>,
    pub duration_secs: u64,
    pub processing_interval_ms: u64,
    pub bundle_probe_delay_ms: u64,
    pub script_suffix: String,
    pub fetch: bool,
    pub catalog: CatalogConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            duration_secs: DEFAULT_DURATION_SECS,
            processing_interval_ms: DEFAULT_PROCESSING_INTERVAL.as_millis() as u64,
            bundle_probe_delay_ms: DEFAULT_BUNDLE_PROBE_DELAY.as_millis() as u64,
            script_suffix: ".js".to_string(),
            fetch: false,
            catalog: CatalogConfig::default(),
        }
    }
}

impl BenchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| BenchError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load the configured file (if any) and apply command-line overrides.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(store) = &cli.store {
            self.store_path = Some(store.clone());
        }
        if let Some(secs) = cli.duration_secs {
            self.duration_secs = secs;
        }
        if cli.fetch {
            self.fetch = true;
        }
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            processing_interval: Duration::from_millis(self.processing_interval_ms.max(1)),
            bundle_probe_delay: Duration::from_millis(self.bundle_probe_delay_ms),
            script_suffix: self.script_suffix.clone(),
        }
    }

    /// Store location: configured path, else `<data dir>/rivo/state.db`.
    pub fn store_location(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(default_store_path)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("rivo").join("state.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_aggregator() {
        let config = BenchConfig::default();
        let metrics = config.metrics_config();
        assert_eq!(metrics.processing_interval, Duration::from_millis(100));
        assert_eq!(metrics.bundle_probe_delay, Duration::from_millis(2000));
        assert_eq!(metrics.script_suffix, ".js");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = BenchConfig {
            duration_secs: 30,
            ..Default::default()
        };
        let cli = Cli {
            store: Some(PathBuf::from("/tmp/x.db")),
            duration_secs: Some(2),
            fetch: true,
            ..Default::default()
        };
        config.apply(&cli);

        assert_eq!(config.duration_secs, 2);
        assert_eq!(config.store_location(), Some(PathBuf::from("/tmp/x.db")));
        assert!(config.fetch);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = BenchConfig {
            processing_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.metrics_config().processing_interval, Duration::from_millis(1));
    }
}
