//! Error types for kpush-core

use std::path::PathBuf;

/// Result type for kpush-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kpush-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two descriptors declare the same job name
    #[error("Duplicate job name '{name}' in {first} and {second}")]
    DuplicateJob {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A command that needs a time window was run without one
    #[error("A time window is required, e.g. -t 2h")]
    MissingTimeWindow,

    /// A time window was given but could not be parsed
    #[error("Invalid time window '{value}': {message}")]
    InvalidTimeWindow { value: String, message: String },

    /// The local directory a job pushes from does not exist
    #[error("Source directory for job '{job}' not found: {path}")]
    SourceMissing { job: String, path: PathBuf },

    /// One or more files of a pass could not be transferred
    #[error("Transfer failed for job '{job}': {message}")]
    Transfer { job: String, message: String },

    /// An external transfer command exited unsuccessfully
    #[error("Command '{program}' failed with code {code}: {stderr}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// The job's watch worker could not be started
    #[error("Failed to start watch for job '{job}': {source}")]
    WatchStart {
        job: String,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from kpush-fs
    #[error(transparent)]
    Fs(#[from] kpush_fs::Error),

    /// Descriptor error from kpush-meta
    #[error(transparent)]
    Meta(#[from] kpush_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
