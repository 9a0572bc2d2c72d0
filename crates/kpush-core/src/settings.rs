//! Resolved runtime settings
//!
//! Command-line values and `KPUSH_HOME` are folded into one [`Settings`]
//! before any job is loaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kpush_fs::{KpushPath, expand_home};

use crate::filter::JobFilter;
use crate::loader::LoadPolicy;

/// Default watch interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// kpush home, `~/.kpush` unless overridden
    pub home: PathBuf,
    /// Descriptor directory or single descriptor file
    pub config_path: PathBuf,
    /// Where job watermarks are persisted
    pub state_dir: PathBuf,
    /// Watch loop interval
    pub interval: Duration,
    /// Relative time window argument, unparsed
    pub window: Option<String>,
    pub filter: JobFilter,
    pub policy: LoadPolicy,
}

impl Settings {
    /// Resolve settings from a home override (usually `KPUSH_HOME`).
    pub fn new(home: Option<&str>) -> Self {
        let home = expand_home(
            home.map(str::trim)
                .filter(|h| !h.is_empty())
                .unwrap_or(KpushPath::DefaultHome.as_str()),
        );
        Self {
            config_path: home.join(KpushPath::ConfigDir),
            state_dir: home.join(KpushPath::StateDir),
            home,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            window: None,
            filter: JobFilter::all(),
            policy: LoadPolicy::default(),
        }
    }

    /// Use an explicit descriptor directory or file instead of `<home>/config`.
    pub fn with_config_path(mut self, path: Option<&Path>) -> Self {
        if let Some(path) = path {
            self.config_path = expand_home(&path.to_string_lossy());
        }
        self
    }

    pub fn with_interval_ms(mut self, millis: u64) -> Self {
        self.interval = Duration::from_millis(millis);
        self
    }

    pub fn with_window(mut self, window: Option<String>) -> Self {
        self.window = window;
        self
    }

    /// Job-name filter from positional arguments.
    pub fn with_filters<S: AsRef<str>>(mut self, filters: &[S]) -> Self {
        self.filter = JobFilter::new(filters);
        tracing::debug!(filter = ?self.filter, "Job filter");
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.policy = if strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Isolate
        };
        self
    }
}
