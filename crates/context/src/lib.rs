//! Host environment abstraction for rivo.
//!
//! The storefront runs its telemetry and cache-mode logic against an
//! explicit environment handle instead of probing for globals. The handle may
//! carry:
//! - a browsing context (clock, timers, performance observation, resource timeline)
//! - a durable string store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  provider.rs - BrowsingContext trait, Environment handle     │
//! │  resource.rs - Resource timeline entries                     │
//! │  timer.rs    - Timer cancellation handles                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Infrastructure Layer                        │
//! │  event_loop.rs - Threaded dispatcher (production)            │
//! │  manual.rs     - Hand-driven clock (tests, trace replay)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rivo_context::{Environment, EventLoop, Signal};
//!
//! let event_loop = EventLoop::start()?;
//! let context = event_loop.context();
//! let env = Environment::new(context.clone());
//!
//! // An embedder forwards browser samples onto the loop.
//! context.report(Signal::LargestContentfulPaint, 1180.0, false);
//! ```

mod event_loop;
mod manual;
mod provider;
mod resource;
mod timer;

// Re-export main types
pub use event_loop::{EventLoop, LoopContext};
pub use manual::ManualBrowsingContext;
pub use provider::{
    BrowsingContext, Environment, IntervalTask, Reporting, SampleSink, Signal, TimeoutTask,
};
pub use resource::ResourceTiming;
pub use timer::TimerHandle;

// Re-export the storage trait the environment carries
pub use rivo_storage::KeyValueStore;
