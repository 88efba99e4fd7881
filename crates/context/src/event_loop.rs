//! Threaded event loop implementing [`BrowsingContext`].
//!
//! A single dispatcher thread runs every timer tick, observation delivery and
//! posted job one after another, so consumers see the same sequential
//! delivery a browser main thread gives them. Timers sleep on helper threads
//! and only post jobs to the dispatcher.

use crate::provider::{
    BrowsingContext, IntervalTask, ObserverSet, Reporting, SampleSink, Signal, TimeoutTask,
};
use crate::resource::ResourceTiming;
use crate::timer::TimerHandle;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Browsing context backed by the event loop's dispatcher thread.
pub struct LoopContext {
    origin: Instant,
    jobs: Sender<Job>,
    running: Arc<AtomicBool>,
    observers: Arc<ObserverSet>,
    resources: Mutex<Vec<ResourceTiming>>,
}

impl LoopContext {
    /// Queue a job on the dispatcher. Returns false once the loop has stopped.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        post_job(&self.jobs, &self.running, Box::new(job))
    }

    /// Queue delivery of a raw sample to the observers of `signal`.
    pub fn report(&self, signal: Signal, value: f64, is_final: bool) -> bool {
        let observers = Arc::clone(&self.observers);
        self.post(move || {
            for sink in observers.take_sinks(signal, is_final) {
                sink(value);
            }
        })
    }

    /// Append an entry to the resource timeline.
    pub fn record_resource(&self, entry: ResourceTiming) {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn post_job(jobs: &Sender<Job>, running: &AtomicBool, job: Job) -> bool {
    if !running.load(Ordering::SeqCst) {
        return false;
    }
    jobs.send(job).is_ok()
}

impl BrowsingContext for LoopContext {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn observe(&self, signal: Signal, reporting: Reporting, sink: SampleSink) {
        tracing::debug!(?signal, ?reporting, "observer registered");
        self.observers.register(signal, reporting, sink);
    }

    fn set_interval(&self, period: Duration, task: IntervalTask) -> TimerHandle {
        let handle = TimerHandle::new();
        let timer = handle.clone();
        let jobs = self.jobs.clone();
        let running = Arc::clone(&self.running);
        let task = Arc::new(Mutex::new(task));

        std::thread::spawn(move || loop {
            std::thread::sleep(period);
            if timer.is_cancelled() || !running.load(Ordering::SeqCst) {
                break;
            }

            let task = Arc::clone(&task);
            let tick_timer = timer.clone();
            let posted = post_job(
                &jobs,
                &running,
                Box::new(move || {
                    if !tick_timer.is_cancelled() {
                        let mut task = task.lock().unwrap_or_else(|e| e.into_inner());
                        (*task)();
                    }
                }),
            );
            if !posted {
                break;
            }
        });

        handle
    }

    fn set_timeout(&self, delay: Duration, task: TimeoutTask) -> TimerHandle {
        let handle = TimerHandle::new();
        let timer = handle.clone();
        let jobs = self.jobs.clone();
        let running = Arc::clone(&self.running);

        std::thread::spawn(move || {
            std::thread::sleep(delay);
            if timer.is_cancelled() {
                return;
            }
            post_job(
                &jobs,
                &running,
                Box::new(move || {
                    if !timer.is_cancelled() {
                        task();
                    }
                }),
            );
        });

        handle
    }

    fn resource_entries(&self) -> Vec<ResourceTiming> {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Owner of the dispatcher thread.
pub struct EventLoop {
    context: Arc<LoopContext>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl EventLoop {
    /// Spawn the dispatcher thread.
    pub fn start() -> std::io::Result<Self> {
        let (jobs, queue) = crossbeam_channel::unbounded::<Job>();
        let running = Arc::new(AtomicBool::new(true));

        let context = Arc::new(LoopContext {
            origin: Instant::now(),
            jobs,
            running: Arc::clone(&running),
            observers: Arc::new(ObserverSet::default()),
            resources: Mutex::new(Vec::new()),
        });

        let handle = std::thread::Builder::new()
            .name("rivo-event-loop".to_string())
            .spawn(move || dispatch(queue, running))?;

        Ok(Self {
            context,
            handle: Some(handle),
        })
    }

    /// Shared handle usable as a [`BrowsingContext`].
    pub fn context(&self) -> Arc<LoopContext> {
        Arc::clone(&self.context)
    }

    /// Stop the dispatcher. Jobs still queued are dropped; timers stop at
    /// their next tick. Idempotent.
    pub fn shutdown(&mut self) {
        if self.context.running.swap(false, Ordering::SeqCst) {
            // Wake the dispatcher so it notices the flag.
            let _ = self.context.jobs.send(Box::new(|| {}));
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.context.is_running()
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn dispatch(queue: Receiver<Job>, running: Arc<AtomicBool>) {
    tracing::info!("event loop started");

    for job in queue.iter() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        job();
    }

    tracing::info!("event loop stopped");
}
