//! Job descriptor metadata for kpush.
//!
//! One YAML descriptor per job names the job, where its files come from and
//! which pod/container they are pushed to.

pub mod error;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use schema::{DEFAULT_POLL, JobDescriptor};
pub use validation::validate_descriptor;

use kpush_fs::ConfigStore;
use std::path::Path;

/// Read, parse and validate the descriptor stored at `path`.
pub fn load_descriptor(path: &Path) -> Result<JobDescriptor> {
    tracing::debug!(path = %path.display(), "Loading job descriptor");
    let descriptor: JobDescriptor = ConfigStore::new().load(path)?;
    validate_descriptor(path, &descriptor)?;
    Ok(descriptor)
}
