//! The config-watch control loop
//!
//! One tick of [`WatchLoop`]:
//!
//! 1. render a status snapshot through the [`StatusSink`]
//! 2. sleep for the interval through the [`Sleeper`]; an interrupt here
//!    ends the loop
//! 3. walk a snapshot of job names in registry order, evicting jobs whose
//!    descriptor was removed and rebuilding jobs whose descriptor changed
//!
//! The registry is an owned value threaded through each step. On exit every
//! remaining job has its watch stopped exactly once.

use std::path::Path;
use std::time::Duration;

use crate::job::{Job, JobFactory, JobStatus};
use crate::loader::ConfigLoader;
use crate::registry::JobRegistry;

/// How a sleep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Interrupted,
}

/// The loop's only suspension point.
pub trait Sleeper {
    fn sleep(&mut self, interval: Duration) -> Wake;
}

impl<F: FnMut(Duration) -> Wake> Sleeper for F {
    fn sleep(&mut self, interval: Duration) -> Wake {
        self(interval)
    }
}

/// Receives what the loop has to show.
pub trait StatusSink {
    fn render(&mut self, rows: &[JobStatus]);

    /// A one-line, user-facing notice such as `web removed`.
    fn notice(&mut self, message: &str) {
        let _ = message;
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn render(&mut self, _rows: &[JobStatus]) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Constructed, jobs not started
    Idle,
    Running,
    /// Interrupt received, stopping jobs
    Stopping,
    Stopped,
}

/// What one tick changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Jobs evicted because their descriptor disappeared
    pub removed: Vec<String>,
    /// Jobs rebuilt from a changed descriptor
    pub reloaded: Vec<String>,
    /// Jobs whose changed descriptor could not be rebuilt
    pub dropped: Vec<String>,
    /// The sleep was interrupted; no re-evaluation happened
    pub interrupted: bool,
}

/// Long-running watch over a registry.
pub struct WatchLoop<'a, F, S, R> {
    loader: &'a ConfigLoader<F>,
    interval: Duration,
    sleeper: S,
    sink: R,
    state: WatchState,
}

impl<'a, F, S, R> WatchLoop<'a, F, S, R>
where
    F: JobFactory,
    S: Sleeper,
    R: StatusSink,
{
    pub fn new(loader: &'a ConfigLoader<F>, interval: Duration, sleeper: S, sink: R) -> Self {
        Self {
            loader,
            interval,
            sleeper,
            sink,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Run until interrupted and hand back the stopped registry.
    pub fn run(&mut self, registry: JobRegistry<F::Job>) -> JobRegistry<F::Job> {
        let mut registry = self.start(registry);
        loop {
            let (next, report) = self.tick(registry);
            registry = next;
            if report.interrupted {
                break;
            }
        }
        self.shutdown(registry)
    }

    /// Start every job's watch and enter [`WatchState::Running`].
    pub fn start(&mut self, mut registry: JobRegistry<F::Job>) -> JobRegistry<F::Job> {
        for job in registry.iter_mut() {
            if let Err(e) = job.start_watch() {
                tracing::warn!(job = job.name(), "Failed to start watch: {e}");
            }
        }
        self.state = WatchState::Running;
        tracing::info!(jobs = registry.len(), interval = ?self.interval, "Watching");
        registry
    }

    /// Render, sleep and, unless interrupted, re-evaluate every job.
    pub fn tick(&mut self, registry: JobRegistry<F::Job>) -> (JobRegistry<F::Job>, TickReport) {
        self.sink.render(&registry.snapshot());

        if self.sleeper.sleep(self.interval) == Wake::Interrupted {
            tracing::info!("Interrupted, stopping watch");
            self.state = WatchState::Stopping;
            let report = TickReport {
                interrupted: true,
                ..TickReport::default()
            };
            return (registry, report);
        }

        self.reconcile(registry)
    }

    /// Evict removed jobs and rebuild changed ones.
    pub fn reconcile(
        &mut self,
        mut registry: JobRegistry<F::Job>,
    ) -> (JobRegistry<F::Job>, TickReport) {
        let mut report = TickReport::default();

        for name in registry.names() {
            let Some(job) = registry.get(&name) else {
                continue;
            };

            if job.config_file_removed() {
                tracing::info!(job = %name, "Config removed");
                if let Some(mut old) = registry.remove(&name) {
                    old.stop_watch();
                }
                self.sink.notice(&format!("{name} removed"));
                report.removed.push(name);
            } else if job.config_file_changed() {
                tracing::info!(job = %name, "Config changed");
                self.sink.notice(&format!("{name} changed"));
                let Some(mut old) = registry.remove(&name) else {
                    continue;
                };
                old.stop_watch();
                let path = old.config_file().to_path_buf();
                drop(old);

                match self.reload(&mut registry, &path) {
                    Some(new_name) => report.reloaded.push(new_name),
                    None => report.dropped.push(name),
                }
            }
        }

        (registry, report)
    }

    /// Stop every remaining job and enter [`WatchState::Stopped`].
    pub fn shutdown(&mut self, mut registry: JobRegistry<F::Job>) -> JobRegistry<F::Job> {
        self.state = WatchState::Stopping;
        for job in registry.iter_mut() {
            job.stop_watch();
        }
        self.sink.notice("Exited");
        self.state = WatchState::Stopped;
        registry
    }

    /// Rebuild the job at `path` and start it; `None` if the slot is dropped.
    fn reload(&mut self, registry: &mut JobRegistry<F::Job>, path: &Path) -> Option<String> {
        let job = match self.loader.load_file(path) {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::info!(path = %path.display(), "Reloaded job no longer matches filter");
                return None;
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "Reload failed: {e}");
                return None;
            }
        };

        let name = job.name().to_string();
        if let Err(e) = registry.insert(job) {
            tracing::error!(path = %path.display(), "Reload failed: {e}");
            return None;
        }
        if let Some(job) = registry.get_mut(&name) {
            if let Err(e) = job.start_watch() {
                tracing::warn!(job = %name, "Failed to start watch: {e}");
            }
        }
        Some(name)
    }
}
