//! Control core for kpush
//!
//! This crate owns the lifecycle of configured jobs:
//!
//! - **Loading**: [`ConfigLoader`] turns a directory of descriptors into a
//!   name-sorted [`JobRegistry`], honouring a [`JobFilter`]
//! - **Dispatch**: [`CommandDispatcher`] runs one-shot commands (push, test,
//!   touch, reset, status) over every job in registry order
//! - **Watching**: [`WatchLoop`] keeps jobs watching and evicts or reloads
//!   them when their descriptor files are removed or edited
//!
//! Jobs are reached only through the [`Job`] trait. [`SyncJob`] is the
//! implementation shipped with the CLI; tests substitute their own.
//!
//! # Architecture
//!
//! ```text
//!                  kpush-cli
//!                      |
//!                  kpush-core
//!                   /      \
//!           kpush-meta   kpush-fs
//! ```

pub mod clock;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod job;
pub mod loader;
pub mod registry;
pub mod settings;
pub mod shutdown;
pub mod sync;
pub mod watch;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock, format_timestamp};
pub use dispatcher::{Command, CommandDispatcher, DispatchReport};
pub use error::{Error, Result};
pub use filter::JobFilter;
pub use job::{Destination, Job, JobFactory, JobStatus};
pub use loader::{ConfigLoader, LoadFailure, LoadPolicy, LoadReport};
pub use registry::JobRegistry;
pub use settings::{DEFAULT_INTERVAL_MS, Settings};
pub use shutdown::ShutdownSignal;
pub use sync::{KubectlTransport, SyncJob, SyncJobFactory, Transport, WatermarkStore};
pub use watch::{NullSink, Sleeper, StatusSink, TickReport, Wake, WatchLoop, WatchState};
pub use window::TimeWindow;
