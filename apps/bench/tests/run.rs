//! End-to-end bench runs on the threaded event loop.

use rivo_bench::{run, BenchError, CacheArg, Cli};
use rivo_mode::REDIS_ENABLED_KEY;
use rivo_storage::{Database, KeyValueStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TRACE: &str = r#"{"at_ms": 0, "resource": {"name": "https://shop.example/_next/app.js", "transfer_size": 40960}}
{"at_ms": 0, "resource": {"name": "https://shop.example/hero.webp", "transfer_size": 512000}}
{"at_ms": 5, "signal": "ttfb", "value": 88.4, "final": true}
{"at_ms": 10, "signal": "lcp", "value": 640.3}
{"at_ms": 20, "signal": "lcp", "value": 1180.7}
{"at_ms": 25, "signal": "cls", "value": 0.0123}
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn fast_config(dir: &Path) -> PathBuf {
    write(
        dir,
        "bench.json",
        r#"{"duration_secs": 1, "processing_interval_ms": 10, "bundle_probe_delay_ms": 50}"#,
    )
}

#[test]
fn test_trace_replay_produces_snapshot() {
    let dir = TempDir::new().unwrap();
    let cli = Cli {
        config: Some(fast_config(dir.path())),
        store: Some(dir.path().join("state.db")),
        trace: Some(write(dir.path(), "trace.jsonl", TRACE)),
        ..Default::default()
    };

    let snapshot = run(&cli).unwrap();

    assert_eq!(snapshot.ttfb, 88.0);
    assert_eq!(snapshot.lcp, 1181.0);
    assert_eq!(snapshot.cls, 0.0123);
    assert_eq!(snapshot.bundle_size, 40.0);
    assert!(snapshot.processing_time > 0.0);
}

#[test]
fn test_cache_flag_is_persisted() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("nested").join("state.db");
    let config = write(dir.path(), "bench.json", r#"{"duration_secs": 0}"#);

    let cli = Cli {
        config: Some(config),
        store: Some(store.clone()),
        cache: Some(CacheArg::On),
        ..Default::default()
    };
    run(&cli).unwrap();

    let db = Database::open(&store).unwrap();
    assert_eq!(db.get(REDIS_ENABLED_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn test_missing_trace_is_io_error() {
    let dir = TempDir::new().unwrap();
    let cli = Cli {
        config: Some(write(dir.path(), "bench.json", r#"{"duration_secs": 0}"#)),
        store: Some(dir.path().join("state.db")),
        trace: Some(dir.path().join("absent.jsonl")),
        ..Default::default()
    };
    assert!(matches!(run(&cli), Err(BenchError::Io(_))));
}

#[test]
fn test_malformed_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let cli = Cli {
        config: Some(write(dir.path(), "bench.json", r#"{"duration_secs": "soon"}"#)),
        ..Default::default()
    };
    assert!(matches!(run(&cli), Err(BenchError::Config { .. })));
}
