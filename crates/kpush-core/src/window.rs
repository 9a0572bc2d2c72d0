//! Relative time windows
//!
//! A window like `2h` or `45m` is turned into an absolute cutoff by
//! subtracting it from "now". An absent, blank or unparsable window has
//! cutoff `0`, the epoch, which means "no watermark".

use std::time::Duration;

use crate::clock::Clock;
use crate::{Error, Result};

/// A parsed relative duration, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    duration: Option<Duration>,
}

impl TimeWindow {
    /// Parse a window argument leniently.
    ///
    /// Unparsable input is logged and treated as no window.
    pub fn parse(arg: Option<&str>) -> Self {
        match Self::parse_strict(arg) {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!("{e}; ignoring time window");
                Self::default()
            }
        }
    }

    /// Parse a window argument, rejecting input that is set but invalid.
    ///
    /// Absent and blank input both yield an unset window.
    pub fn parse_strict(arg: Option<&str>) -> Result<Self> {
        let Some(raw) = arg.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };
        humantime::parse_duration(raw)
            .map(Self::from_duration)
            .map_err(|e| Error::InvalidTimeWindow {
                value: raw.to_string(),
                message: e.to_string(),
            })
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
        }
    }

    /// Whether a usable duration was supplied.
    pub fn is_set(&self) -> bool {
        self.duration.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Absolute cutoff in epoch milliseconds, `0` when unset.
    pub fn cutoff(&self, clock: &impl Clock) -> i64 {
        match self.duration {
            Some(d) => {
                let back = i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
                clock.now_millis().saturating_sub(back).max(0)
            }
            None => 0,
        }
    }
}
