//! The job capability
//!
//! The control core never looks inside a job. Everything it needs, from
//! identity to watch lifecycle, goes through [`Job`].

use std::path::Path;

use crate::Result;

/// Where a job delivers its files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub namespace: String,
    pub pod: String,
    pub container: Option<String>,
}

/// One row of a status snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub name: String,
    /// Files found by the current pass that are not transferred yet
    pub pending: u64,
    /// Files seen by the last scan
    pub watched: u64,
    /// Files transferred since the job was built
    pub transferred: u64,
    /// Transfer failures since the job was built
    pub errors: u64,
    /// Start of the most recent pass, epoch ms, `0` if none ran
    pub last_update_start: i64,
}

/// A configured synchronization target.
///
/// Mutating calls return a [`Result`], but callers in the core treat a
/// failure as opaque: it is logged and the next job is visited.
pub trait Job {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    /// Descriptor file the job was built from.
    fn config_file(&self) -> &Path;

    /// Current watermark, epoch ms; `0` if never pushed.
    fn last_updated(&self) -> i64;

    fn destination(&self) -> Destination;

    fn status(&self) -> JobStatus;

    /// Move the watermark to `cutoff`.
    fn touch_time(&mut self, cutoff: i64) -> Result<()>;

    /// Transfer what changed since the watermark.
    fn push(&mut self) -> Result<()>;

    /// Transfer everything, ignoring the watermark.
    fn push_all(&mut self) -> Result<()>;

    /// Report what changed since `cutoff` without transferring.
    fn test(&mut self, cutoff: i64) -> Result<()>;

    /// Begin the job's own change tracking. Idempotent.
    fn start_watch(&mut self) -> Result<()>;

    /// End the job's own change tracking. Idempotent.
    fn stop_watch(&mut self);

    fn config_file_removed(&self) -> bool;

    fn config_file_changed(&self) -> bool;
}

/// Builds a job from one descriptor file.
pub trait JobFactory {
    type Job: Job;

    fn build(&self, path: &Path) -> Result<Self::Job>;
}

impl<F: JobFactory + ?Sized> JobFactory for &F {
    type Job = F::Job;

    fn build(&self, path: &Path) -> Result<Self::Job> {
        (**self).build(path)
    }
}
