//! Constants for the kpush home layout.

use std::path::Path;

/// Environment variable that overrides the kpush home directory.
pub const HOME_ENV: &str = "KPUSH_HOME";

/// Extension of job descriptor files, without the dot.
pub const DESCRIPTOR_EXTENSION: &str = "yaml";

/// Well-known locations under the kpush home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpushPath {
    /// The default home directory, relative to the user's home (`~/.kpush`)
    DefaultHome,
    /// Directory holding one descriptor per job
    ConfigDir,
    /// Directory holding persisted per-job watermarks
    StateDir,
}

impl KpushPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultHome => "~/.kpush",
            Self::ConfigDir => "config",
            Self::StateDir => "state",
        }
    }
}

impl AsRef<Path> for KpushPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for KpushPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for KpushPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
