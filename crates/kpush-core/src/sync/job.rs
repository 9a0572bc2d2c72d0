//! [`SyncJob`]: the descriptor-backed [`Job`]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use kpush_fs::checksum::compute_file_checksum;
use kpush_meta::{JobDescriptor, load_descriptor};

use super::scan::{ScannedFile, scan};
use super::state::WatermarkStore;
use super::transport::Transport;
use crate::clock::{Clock, SystemClock};
use crate::job::{Destination, Job, JobFactory, JobStatus};
use crate::shutdown::ShutdownSignal;
use crate::{Error, Result};

/// Builds [`SyncJob`]s that share one transport and one state directory.
#[derive(Clone)]
pub struct SyncJobFactory {
    store: WatermarkStore,
    transport: Arc<dyn Transport>,
}

impl SyncJobFactory {
    pub fn new(store: WatermarkStore, transport: Arc<dyn Transport>) -> Self {
        Self { store, transport }
    }
}

impl JobFactory for SyncJobFactory {
    type Job = SyncJob;

    fn build(&self, path: &Path) -> Result<SyncJob> {
        SyncJob::load(path, self.store.clone(), Arc::clone(&self.transport))
    }
}

/// Counters shared between the job and its watch worker.
#[derive(Debug, Default)]
struct Counters {
    pending: AtomicU64,
    watched: AtomicU64,
    transferred: AtomicU64,
    errors: AtomicU64,
    last_update_start: AtomicI64,
}

/// State reachable from the watch worker thread.
struct Shared {
    descriptor: JobDescriptor,
    transport: Arc<dyn Transport>,
    store: WatermarkStore,
    watermark: AtomicI64,
    counters: Counters,
}

struct Watcher {
    stop: ShutdownSignal,
    handle: JoinHandle<()>,
}

/// Pushes a local directory into a container.
pub struct SyncJob {
    config_file: PathBuf,
    fingerprint: String,
    shared: Arc<Shared>,
    watcher: Option<Watcher>,
}

impl SyncJob {
    /// Build a job from the descriptor at `path`.
    pub fn load(path: &Path, store: WatermarkStore, transport: Arc<dyn Transport>) -> Result<Self> {
        let fingerprint = compute_file_checksum(path)?;
        let descriptor = load_descriptor(path)?;
        let watermark = store.load(&descriptor.name)?;

        Ok(Self {
            config_file: path.to_path_buf(),
            fingerprint,
            shared: Arc::new(Shared {
                descriptor,
                transport,
                store,
                watermark: AtomicI64::new(watermark),
                counters: Counters::default(),
            }),
            watcher: None,
        })
    }

    pub fn descriptor(&self) -> &JobDescriptor {
        &self.shared.descriptor
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

impl Shared {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn destination(&self) -> Destination {
        Destination {
            namespace: self.descriptor.namespace.clone(),
            pod: self.descriptor.pod.clone(),
            container: self.descriptor.container.clone(),
        }
    }

    fn set_watermark(&self, watermark: i64) -> Result<()> {
        self.store.save(self.name(), watermark)?;
        self.watermark.store(watermark, Ordering::SeqCst);
        Ok(())
    }

    /// Files modified at or after `since` (all files when `None`).
    fn changed_since(&self, since: Option<i64>) -> Result<Vec<ScannedFile>> {
        let source = self.descriptor.source_dir();
        if !source.is_dir() {
            return Err(Error::SourceMissing {
                job: self.name().to_string(),
                path: source,
            });
        }

        let files = scan(&source, &self.descriptor);
        self.counters
            .watched
            .store(files.len() as u64, Ordering::Relaxed);
        Ok(files
            .into_iter()
            .filter(|f| since.is_none_or(|s| f.modified >= s))
            .collect())
    }

    /// Transfer files changed since `since` and advance the watermark to the
    /// start of the pass if every transfer succeeded.
    ///
    /// The watermark is floored to a whole second so files written later in
    /// the same second are still picked up on filesystems with 1 s mtimes.
    fn pass(&self, since: Option<i64>) -> Result<()> {
        let start = SystemClock.now_millis();
        self.counters
            .last_update_start
            .store(start, Ordering::Relaxed);

        let files = self.changed_since(since)?;
        self.counters
            .pending
            .store(files.len() as u64, Ordering::Relaxed);

        let destination = self.destination();
        let total = files.len();
        let mut failed = 0;
        for file in files {
            let remote = format!(
                "{}/{}",
                self.descriptor.target.trim_end_matches('/'),
                file.relative
            );
            match self.transport.copy(&destination, &file.path, &remote) {
                Ok(()) => {
                    tracing::debug!(job = self.name(), file = %file.relative, "Transferred");
                    self.counters.transferred.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(job = self.name(), file = %file.relative, "Transfer failed: {e}");
                    self.counters.errors.fetch_add(1, Ordering::Relaxed);
                    failed += 1;
                }
            }
            self.counters.pending.fetch_sub(1, Ordering::Relaxed);
        }

        if failed > 0 {
            return Err(Error::Transfer {
                job: self.name().to_string(),
                message: format!("{failed} of {total} files failed"),
            });
        }

        if total > 0 {
            tracing::info!(job = self.name(), files = total, "Pushed");
        }
        self.set_watermark(floor_to_second(start))
    }
}

fn floor_to_second(millis: i64) -> i64 {
    millis - millis.rem_euclid(1000)
}

impl Job for SyncJob {
    fn name(&self) -> &str {
        self.shared.name()
    }

    fn config_file(&self) -> &Path {
        &self.config_file
    }

    fn last_updated(&self) -> i64 {
        self.shared.watermark.load(Ordering::SeqCst)
    }

    fn destination(&self) -> Destination {
        self.shared.destination()
    }

    fn status(&self) -> JobStatus {
        let c = &self.shared.counters;
        JobStatus {
            name: self.name().to_string(),
            pending: c.pending.load(Ordering::Relaxed),
            watched: c.watched.load(Ordering::Relaxed),
            transferred: c.transferred.load(Ordering::Relaxed),
            errors: c.errors.load(Ordering::Relaxed),
            last_update_start: c.last_update_start.load(Ordering::Relaxed),
        }
    }

    fn touch_time(&mut self, cutoff: i64) -> Result<()> {
        tracing::debug!(job = self.name(), cutoff, "Touch");
        self.shared.set_watermark(cutoff)
    }

    fn push(&mut self) -> Result<()> {
        let since = self.last_updated();
        self.shared.pass(Some(since))
    }

    fn push_all(&mut self) -> Result<()> {
        self.shared.pass(None)
    }

    fn test(&mut self, cutoff: i64) -> Result<()> {
        let files = self.shared.changed_since(Some(cutoff))?;
        for file in &files {
            tracing::info!(job = self.name(), file = %file.relative, "Would transfer");
        }
        self.shared
            .counters
            .pending
            .store(files.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn start_watch(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }

        let stop = ShutdownSignal::new();
        let shared = Arc::clone(&self.shared);
        let worker_stop = stop.clone();
        let poll = shared.descriptor.poll_interval();

        let handle = thread::Builder::new()
            .name(format!("kpush-{}", self.name()))
            .spawn(move || {
                loop {
                    let since = shared.watermark.load(Ordering::SeqCst);
                    if let Err(e) = shared.pass(Some(since)) {
                        tracing::debug!(job = shared.name(), "Watch pass failed: {e}");
                    }
                    if worker_stop.wait_timeout(poll) {
                        break;
                    }
                }
            })
            .map_err(|e| Error::WatchStart {
                job: self.name().to_string(),
                source: e,
            })?;

        tracing::debug!(job = self.name(), "Watch started");
        self.watcher = Some(Watcher { stop, handle });
        Ok(())
    }

    fn stop_watch(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop.trigger();
            if watcher.handle.join().is_err() {
                tracing::error!(job = self.name(), "Watch worker panicked");
            }
            tracing::debug!(job = self.name(), "Watch stopped");
        }
    }

    fn config_file_removed(&self) -> bool {
        !self.config_file.is_file()
    }

    fn config_file_changed(&self) -> bool {
        match compute_file_checksum(&self.config_file) {
            Ok(current) => current != self.fingerprint,
            Err(_) => false,
        }
    }
}

impl Drop for SyncJob {
    fn drop(&mut self) {
        self.stop_watch();
    }
}

impl std::fmt::Debug for SyncJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncJob")
            .field("name", &self.name())
            .field("config_file", &self.config_file)
            .field("watching", &self.is_watching())
            .finish()
    }
}
