//! Filesystem layer for kpush
//!
//! Provides home-directory resolution, format-aware config loading,
//! atomic state writes and the checksum used to fingerprint job descriptors.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{DESCRIPTOR_EXTENSION, HOME_ENV, KpushPath};
pub use error::{Error, Result};
pub use path::{expand_home, has_extension};
