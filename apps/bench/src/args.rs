//! Command-line arguments.

use clap::{Parser, ValueEnum};
use rivo_mode::CacheMode;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "rivo-bench")]
#[command(about = "Replay storefront performance traces through the telemetry aggregator")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SQLite file holding the persisted cache mode
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// JSON-lines performance trace to replay
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Set the cache mode before the run
    #[arg(long, value_enum)]
    pub cache: Option<CacheArg>,

    /// Seconds to observe before printing the snapshot
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Mount the home view against the live catalog
    #[arg(long)]
    pub fetch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    On,
    Off,
}

impl From<CacheArg> for CacheMode {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::On => CacheMode::On,
            CacheArg::Off => CacheMode::Off,
        }
    }
}
