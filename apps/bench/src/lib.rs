//! Headless storefront telemetry bench.
//!
//! Wires the aggregator and the cache-mode broadcaster to a threaded event
//! loop, optionally mounts the home view against the live catalog, replays
//! a recorded performance trace and reports the final metrics snapshot.

mod args;
mod config;
mod error;
mod trace;

pub use args::{CacheArg, Cli};
pub use config::{default_store_path, BenchConfig, DEFAULT_DURATION_SECS};
pub use error::{BenchError, Result};
pub use trace::{load_trace, parse_trace, replay, TraceEvent, TraceTarget};

use rivo_catalog::CatalogClient;
use rivo_context::{Environment, EventLoop, KeyValueStore, LoopContext};
use rivo_events::{EventBusRef, TracingEventBus};
use rivo_metrics::{MetricKind, MetricsService, PerformanceMetrics};
use rivo_mode::{CacheMode, ModeBroadcaster};
use rivo_storage::{Database, MemoryStore};
use rivo_views::{CatalogLoader, CatalogView, MountedView, ViewLoader};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rivo=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Open the SQLite store at `path`, or an in-memory database without one.
pub fn open_store(path: Option<&Path>) -> Result<Arc<dyn KeyValueStore>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            tracing::debug!(path = %path.display(), "opening state store");
            Ok(Arc::new(Database::open(path)?))
        }
        None => Ok(Arc::new(Database::open_in_memory()?)),
    }
}

/// Loader used when no catalog is attached.
struct IdleLoader;

impl ViewLoader for IdleLoader {
    fn load(&self, mode: CacheMode) {
        tracing::debug!(%mode, "load requested, no catalog attached");
    }
}

/// Wait until every job already posted to the loop has run.
fn drain(context: &LoopContext, timeout: Duration) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    if context.post(move || {
        let _ = tx.send(());
    }) {
        let _ = rx.recv_timeout(timeout);
    }
}

/// One line per metric, e.g. `LCP 1805ms`.
pub fn summary(metrics: &PerformanceMetrics) -> Vec<String> {
    MetricKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.label(), metrics.display(*kind)))
        .collect()
}

pub fn run(cli: &Cli) -> Result<PerformanceMetrics> {
    let config = BenchConfig::resolve(cli)?;

    let store = open_store(config.store_location().as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "state store unavailable, cache mode will not persist");
        let fallback: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        fallback
    });

    let mut event_loop = EventLoop::start()?;
    let context = event_loop.context();
    let env = Environment::new(context.clone()).with_durable_store(store);

    let metrics = MetricsService::with_config(&env, config.metrics_config());
    let mode = ModeBroadcaster::new(&env);
    if let Some(cache) = cli.cache {
        mode.toggle(CacheMode::from(cache).is_enabled());
    }
    tracing::info!(mode = %mode.mode(), "cache mode");

    let bus: EventBusRef = Arc::new(TracingEventBus);
    let runtime = if config.fetch {
        Some(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?,
        )
    } else {
        None
    };
    let loader: Arc<dyn ViewLoader> = match &runtime {
        Some(runtime) => Arc::new(CatalogLoader::new(
            CatalogClient::new(config.catalog.clone()),
            CatalogView::Home,
            runtime.handle().clone(),
            Arc::clone(&bus),
        )),
        None => Arc::new(IdleLoader),
    };

    let started = Instant::now();
    let mut view = MountedView::mount("home", Some(&metrics), &mode, loader, bus);

    if let Some(path) = &cli.trace {
        let events = load_trace(path)?;
        let replayed = replay(&events, context.as_ref());
        tracing::info!(replayed, path = %path.display(), "trace replayed");
    }

    std::thread::sleep(config.duration().saturating_sub(started.elapsed()));
    drain(&context, Duration::from_secs(1));

    let snapshot = metrics.metrics();
    for line in summary(&snapshot) {
        tracing::info!("{}", line);
    }

    view.unmount();
    drop(metrics);
    event_loop.shutdown();
    if let Some(runtime) = runtime {
        runtime.shutdown_timeout(Duration::from_secs(1));
    }

    Ok(snapshot)
}
