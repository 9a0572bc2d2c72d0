//! Status command implementation

use kpush_core::{Command, Settings};

use super::Session;
use crate::error::Result;

/// Print watermarks; a job filter switches to the detailed view.
pub fn run_status(settings: Settings) -> Result<()> {
    Session::open(settings).dispatch(Command::Status)?;
    Ok(())
}
