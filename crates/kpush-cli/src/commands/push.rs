//! Push commands

use colored::Colorize;
use kpush_core::{Command, Job, Settings};

use super::Session;
use crate::error::Result;

/// Push files changed since each watermark, touching to `-t` first if given.
pub fn run_push(settings: Settings) -> Result<()> {
    let registry = Session::open(settings).dispatch(Command::Push)?;
    report(&registry.names(), registry.iter().map(|j| j.status().transferred));
    Ok(())
}

/// Push every file regardless of watermarks.
pub fn run_push_all(settings: Settings) -> Result<()> {
    let registry = Session::open(settings).dispatch(Command::PushAll)?;
    report(&registry.names(), registry.iter().map(|j| j.status().transferred));
    Ok(())
}

fn report(names: &[String], transferred: impl Iterator<Item = u64>) {
    for (name, count) in names.iter().zip(transferred) {
        println!("{} {name}: {count} file(s) pushed", "✓".green());
    }
}
