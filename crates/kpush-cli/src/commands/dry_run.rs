//! Test command: dry-run of a push

use kpush_core::{Command, Job, Settings};

use super::Session;
use crate::error::Result;

/// Show how many files each job would push since now minus `-t`.
///
/// Without `-t` every file counts. Individual files are logged at `info`.
pub fn run_test(settings: Settings) -> Result<()> {
    let registry = Session::open(settings).dispatch(Command::Test)?;
    for job in &registry {
        println!("{}: {} file(s) to push", job.name(), job.status().pending);
    }
    Ok(())
}
