//! Watch command: push continuously until Ctrl+C

use std::collections::VecDeque;
use std::io::Write;

use colored::Colorize;
use kpush_core::{JobStatus, Settings, ShutdownSignal, StatusSink, WatchLoop, format_timestamp};

use super::Session;
use crate::error::Result;

/// Watch every job, redrawing a status table each interval.
pub fn run_watch(settings: Settings) -> Result<()> {
    let session = Session::open(settings);
    let registry = session.load()?;

    let shutdown = ShutdownSignal::new();
    let handler = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, requesting shutdown");
        handler.trigger();
    })?;

    let sink = TableSink::new(std::io::stdout(), true);
    let mut watch = WatchLoop::new(
        session.loader(),
        session.settings().interval,
        shutdown,
        sink,
    );
    let registry = watch.run(registry);
    tracing::debug!(jobs = registry.len(), "Watch finished");
    Ok(())
}

/// Notices kept on screen below the table.
const KEPT_NOTICES: usize = 5;

/// Renders status snapshots as a terminal table.
///
/// Recent notices are redrawn under the table so a cleared screen does not
/// hide them.
pub struct TableSink<W> {
    out: W,
    clear: bool,
    notices: VecDeque<String>,
}

impl<W: Write> TableSink<W> {
    /// `clear` redraws from the top of the screen on every render.
    pub fn new(out: W, clear: bool) -> Self {
        Self {
            out,
            clear,
            notices: VecDeque::with_capacity(KEPT_NOTICES),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_table(&mut self, rows: &[JobStatus]) -> std::io::Result<()> {
        if self.clear {
            write!(self.out, "\x1B[2J\x1B[H")?;
        }

        let width = rows
            .iter()
            .map(|r| r.name.len())
            .chain(std::iter::once(3))
            .max()
            .unwrap_or(3);

        let header = format!(
            "{:<width$}  {:>7}  {:>7}  {:>7}  {:>6}  LAST PASS",
            "JOB", "PENDING", "WATCHED", "PUSHED", "ERRORS"
        );
        writeln!(self.out, "{}", header.bold())?;
        for row in rows {
            writeln!(
                self.out,
                "{:<width$}  {:>7}  {:>7}  {:>7}  {:>6}  {}",
                row.name,
                row.pending,
                row.watched,
                row.transferred,
                row.errors,
                format_timestamp(row.last_update_start)
            )?;
        }
        if !self.notices.is_empty() {
            writeln!(self.out)?;
            for notice in &self.notices {
                writeln!(self.out, "{}", notice.yellow())?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> StatusSink for TableSink<W> {
    fn render(&mut self, rows: &[JobStatus]) {
        if let Err(e) = self.write_table(rows) {
            tracing::debug!("Failed to draw status table: {e}");
        }
    }

    fn notice(&mut self, message: &str) {
        if self.notices.len() == KEPT_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(message.to_string());
        if let Err(e) = writeln!(self.out, "{}", message.yellow()) {
            tracing::debug!("Failed to print notice: {e}");
        }
    }
}
