//! Job descriptor schema - loaded from `<home>/config/*.yaml`
//!
//! # Example YAML
//!
//! ```yaml
//! name: web
//! namespace: default
//! pod: web-0
//! container: app
//! source: ~/work/web/dist
//! target: /srv/www
//! exclude: [".git", "*.tmp"]
//! poll: 1s
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Poll period of a job's own watch when the descriptor sets none.
pub const DEFAULT_POLL: Duration = Duration::from_secs(1);

/// One job as written in its descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobDescriptor {
    /// Unique job name
    pub name: String,
    /// Kubernetes namespace of the destination pod
    pub namespace: String,
    /// Destination pod
    pub pod: String,
    /// Destination container, for multi-container pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Local directory whose files are pushed (`~` is expanded)
    pub source: String,
    /// Absolute directory inside the container
    pub target: String,
    /// Path components (`.git`) or suffix patterns (`*.tmp`) to skip
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Poll period while watching, e.g. `500ms` or `2s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<String>,
}

impl JobDescriptor {
    /// Local source directory with `~` expanded.
    pub fn source_dir(&self) -> PathBuf {
        kpush_fs::expand_home(&self.source)
    }

    /// Watch poll period, falling back to [`DEFAULT_POLL`].
    ///
    /// Validation rejects unparsable values, so the fallback only covers an
    /// absent field.
    pub fn poll_interval(&self) -> Duration {
        self.poll
            .as_deref()
            .and_then(|p| humantime::parse_duration(p).ok())
            .unwrap_or(DEFAULT_POLL)
    }

    /// Whether a path relative to the source directory is excluded.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                relative.ends_with(suffix)
            } else {
                relative.split('/').any(|component| component == pattern)
            }
        })
    }
}
