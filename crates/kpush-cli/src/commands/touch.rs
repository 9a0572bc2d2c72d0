//! Watermark commands

use colored::Colorize;
use kpush_core::{Command, Job, Settings, format_timestamp};

use super::Session;
use crate::error::Result;

/// Move every watermark to now minus `-t`.
pub fn run_touch(settings: Settings) -> Result<()> {
    let registry = Session::open(settings).dispatch(Command::Touch)?;
    for job in &registry {
        println!(
            "{} {} touched to {}",
            "✓".green(),
            job.name(),
            format_timestamp(job.last_updated())
        );
    }
    Ok(())
}

/// Clear every watermark.
pub fn run_reset(settings: Settings) -> Result<()> {
    let registry = Session::open(settings).dispatch(Command::Reset)?;
    for job in &registry {
        println!("{} {} reset", "✓".green(), job.name());
    }
    Ok(())
}
