//! Discovery of job descriptors
//!
//! [`ConfigLoader`] reads either a single descriptor file or a directory of
//! them (non-recursive), builds each into a job, applies the [`JobFilter`]
//! and returns a sorted [`JobRegistry`].
//!
//! ```text
//! ~/.kpush/
//!   config/
//!     api.yaml
//!     web.yaml
//!   state/
//!     api.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kpush_fs::{DESCRIPTOR_EXTENSION, has_extension};

use crate::filter::JobFilter;
use crate::job::{Job, JobFactory};
use crate::registry::JobRegistry;
use crate::{Error, Result};

/// What to do when one descriptor in a directory fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Abort the whole load on the first failure
    Strict,
    /// Record the failure and keep loading the other files
    #[default]
    Isolate,
}

/// A descriptor that could not be turned into a job.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Side results of a load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Descriptors skipped under [`LoadPolicy::Isolate`]
    pub failures: Vec<LoadFailure>,
    /// Names of jobs dropped by the filter
    pub filtered: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads jobs from descriptor files.
pub struct ConfigLoader<F> {
    factory: F,
    filter: JobFilter,
    policy: LoadPolicy,
}

impl<F: JobFactory> ConfigLoader<F> {
    pub fn new(factory: F, filter: JobFilter) -> Self {
        Self {
            factory,
            filter,
            policy: LoadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Load every job under `path`.
    ///
    /// A missing path is not an error: a warning is logged and the registry
    /// is empty.
    pub fn load(&self, path: &Path) -> Result<(JobRegistry<F::Job>, LoadReport)> {
        let mut report = LoadReport::default();

        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config directory not found");
            return Ok((JobRegistry::new(), report));
        }

        let files = if path.is_file() {
            if is_descriptor(path) {
                vec![path.to_path_buf()]
            } else {
                tracing::warn!(path = %path.display(), "Not a .{DESCRIPTOR_EXTENSION} descriptor, nothing to load");
                Vec::new()
            }
        } else {
            descriptor_files(path)?
        };

        let mut jobs = Vec::with_capacity(files.len());
        for file in files {
            match self.build(&file) {
                Ok(job) if self.filter.matches(job.name()) => jobs.push(job),
                Ok(job) => {
                    tracing::trace!(job = job.name(), "Ignored by filter");
                    report.filtered.push(job.name().to_string());
                }
                Err(e) if self.policy == LoadPolicy::Isolate => {
                    tracing::warn!(path = %file.display(), "Skipping job descriptor: {e}");
                    report.failures.push(LoadFailure {
                        path: file,
                        error: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let registry = JobRegistry::from_jobs(jobs)?;
        tracing::debug!(jobs = registry.len(), "Loaded job registry");
        Ok((registry, report))
    }

    /// Build the job described by one file.
    ///
    /// Returns `Ok(None)` if the job is excluded by the filter.
    pub fn load_file(&self, path: &Path) -> Result<Option<F::Job>> {
        let job = self.build(path)?;
        if self.filter.matches(job.name()) {
            Ok(Some(job))
        } else {
            tracing::trace!(job = job.name(), "Ignored by filter");
            Ok(None)
        }
    }

    fn build(&self, path: &Path) -> Result<F::Job> {
        tracing::debug!(path = %path.display(), "Load configuration");
        self.factory.build(path)
    }
}

fn is_descriptor(path: &Path) -> bool {
    has_extension(path, DESCRIPTOR_EXTENSION)
}

/// Regular descriptor files directly inside `dir`, in directory order.
fn descriptor_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| kpush_fs::Error::io(dir, e))?;

    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_descriptor(path))
        .collect())
}
