//! Error types for kpush-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] kpush_fs::Error),

    #[error("Invalid job descriptor at {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },
}
