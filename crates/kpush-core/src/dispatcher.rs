//! One-shot commands over the registry
//!
//! Every command visits each job once, in registry order, and never changes
//! which jobs the registry holds. A failing job is logged and counted; the
//! remaining jobs are still visited.

use std::io::Write;

use crate::clock::{Clock, format_timestamp};
use crate::job::Job;
use crate::registry::JobRegistry;
use crate::window::TimeWindow;
use crate::{Error, Result};

/// Commands that run once over the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Optionally touch to the window, then push what changed
    Push,
    /// Push everything
    PushAll,
    /// Report what changed since the window
    Test,
    /// Move watermarks to the window (window required)
    Touch,
    /// Clear watermarks
    Reset,
    /// Print watermarks, detailed when a filter was given
    Status,
}

/// Outcome of one command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Jobs the command was applied to
    pub visited: usize,
    /// Names of jobs whose call returned an error
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs [`Command`]s over a registry.
pub struct CommandDispatcher<C> {
    clock: C,
    window: Option<String>,
    detailed_status: bool,
}

impl<C: Clock> CommandDispatcher<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            window: None,
            detailed_status: false,
        }
    }

    /// Relative time window from the command line, e.g. `2h`.
    pub fn with_window(mut self, window: Option<String>) -> Self {
        self.window = window;
        self
    }

    /// Print the per-job detail block for `status`.
    pub fn with_detailed_status(mut self, detailed: bool) -> Self {
        self.detailed_status = detailed;
        self
    }

    /// Run `command` over every job; `status` writes to `out`.
    pub fn dispatch<J: Job>(
        &self,
        command: Command,
        registry: &mut JobRegistry<J>,
        out: &mut impl Write,
    ) -> Result<DispatchReport> {
        tracing::debug!(?command, jobs = registry.len(), "Dispatching command");
        match command {
            Command::Push => self.push(registry),
            Command::PushAll => Ok(for_each(registry, "push all", |j| j.push_all())),
            Command::Test => {
                let cutoff = TimeWindow::parse(self.window.as_deref()).cutoff(&self.clock);
                if cutoff > 0 {
                    tracing::info!(since = %format_timestamp(cutoff), "Testing");
                }
                Ok(for_each(registry, "test", |j| j.test(cutoff)))
            }
            Command::Touch => {
                let window = TimeWindow::parse_strict(self.window.as_deref())?;
                if !window.is_set() {
                    return Err(Error::MissingTimeWindow);
                }
                let cutoff = window.cutoff(&self.clock);
                tracing::info!(to = %format_timestamp(cutoff), "Touch");
                Ok(for_each(registry, "touch", |j| j.touch_time(cutoff)))
            }
            Command::Reset => Ok(for_each(registry, "reset", |j| j.touch_time(0))),
            Command::Status => {
                self.status(registry, out)?;
                Ok(DispatchReport {
                    visited: registry.len(),
                    failed: Vec::new(),
                })
            }
        }
    }

    fn push<J: Job>(&self, registry: &mut JobRegistry<J>) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();

        // A supplied but unparsable window still touches, to cutoff 0.
        if self.window.as_deref().is_some_and(|w| !w.trim().is_empty()) {
            let cutoff = TimeWindow::parse(self.window.as_deref()).cutoff(&self.clock);
            tracing::info!(to = %format_timestamp(cutoff), "Touch");
            report = for_each(registry, "touch", |j| j.touch_time(cutoff));
        }

        let pushed = for_each(registry, "push", |j| j.push());
        report.visited = pushed.visited;
        for name in pushed.failed {
            if !report.failed.contains(&name) {
                report.failed.push(name);
            }
        }
        Ok(report)
    }

    fn status<J: Job>(&self, registry: &JobRegistry<J>, out: &mut impl Write) -> Result<()> {
        for job in registry {
            if self.detailed_status {
                let destination = job.destination();
                writeln!(out, "Target: {}", job.name())?;
                writeln!(out, "  Last updated: {}", format_timestamp(job.last_updated()))?;
                writeln!(out, "  File        : {}", job.config_file().display())?;
                writeln!(out, "  Namespace   : {}", destination.namespace)?;
                writeln!(out, "  Pod         : {}", destination.pod)?;
                writeln!(
                    out,
                    "  Container   : {}",
                    destination.container.as_deref().unwrap_or("-")
                )?;
            } else {
                writeln!(out, "{} {}", format_timestamp(job.last_updated()), job.name())?;
            }
        }
        Ok(())
    }
}

fn for_each<J, F>(registry: &mut JobRegistry<J>, action: &str, mut call: F) -> DispatchReport
where
    J: Job,
    F: FnMut(&mut J) -> Result<()>,
{
    let mut report = DispatchReport::default();
    for job in registry.iter_mut() {
        report.visited += 1;
        if let Err(e) = call(job) {
            tracing::warn!(job = job.name(), "{action} failed: {e}");
            report.failed.push(job.name().to_string());
        }
    }
    report
}
