//! Command implementations for kpush-cli

pub mod dry_run;
pub mod push;
pub mod status;
pub mod touch;
pub mod watch;

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use kpush_core::{
    Command, CommandDispatcher, ConfigLoader, DispatchReport, JobRegistry, KubectlTransport,
    Settings, SyncJob, SyncJobFactory, SystemClock, WatermarkStore,
};

use crate::error::{CliError, Result};

pub use push::{run_push, run_push_all};
pub use status::run_status;
pub use dry_run::run_test;
pub use touch::{run_reset, run_touch};
pub use watch::run_watch;

/// Resolved settings plus the loader built from them.
pub struct Session {
    settings: Settings,
    loader: ConfigLoader<SyncJobFactory>,
}

impl Session {
    pub fn open(settings: Settings) -> Self {
        let factory = SyncJobFactory::new(
            WatermarkStore::new(settings.state_dir.clone()),
            Arc::new(KubectlTransport::default()),
        );
        let loader =
            ConfigLoader::new(factory, settings.filter.clone()).with_policy(settings.policy);
        Self { settings, loader }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn loader(&self) -> &ConfigLoader<SyncJobFactory> {
        &self.loader
    }

    /// Load the registry, printing a warning for every skipped descriptor.
    pub fn load(&self) -> Result<JobRegistry<SyncJob>> {
        let (registry, report) = self.loader.load(&self.settings.config_path)?;

        for failure in &report.failures {
            eprintln!(
                "{}: skipped {}: {}",
                "warning".yellow().bold(),
                failure.path.display(),
                failure.error
            );
        }
        if registry.is_empty() && !self.settings.filter.is_empty() {
            eprintln!(
                "{}: no job matches {}",
                "warning".yellow().bold(),
                self.settings.filter.names().collect::<Vec<_>>().join(", ")
            );
        }
        Ok(registry)
    }

    /// Load and run one command, failing if any job failed.
    pub fn dispatch(&self, command: Command) -> Result<JobRegistry<SyncJob>> {
        let mut registry = self.load()?;
        let dispatcher = CommandDispatcher::new(SystemClock)
            .with_window(self.settings.window.clone())
            .with_detailed_status(!self.settings.filter.is_empty());

        let mut stdout = std::io::stdout().lock();
        let report = dispatcher.dispatch(command, &mut registry, &mut stdout)?;
        stdout.flush()?;
        check(&report)?;
        Ok(registry)
    }
}

fn check(report: &DispatchReport) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }
    Err(CliError::user(format!(
        "{} of {} jobs failed: {}",
        report.failed.len(),
        report.visited,
        report.failed.join(", ")
    )))
}
