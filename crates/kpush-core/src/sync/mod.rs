//! The job implementation shipped with kpush
//!
//! A [`SyncJob`] pushes files from a local directory into a container,
//! transferring only what changed since its persisted watermark. Transfers
//! go through a [`Transport`], by default [`KubectlTransport`].

mod job;
mod scan;
mod state;
mod transport;

pub use job::{SyncJob, SyncJobFactory};
pub use scan::{ScannedFile, scan};
pub use state::WatermarkStore;
pub use transport::{KubectlTransport, Transport};
