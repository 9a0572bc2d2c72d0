//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kpush_core::DEFAULT_INTERVAL_MS;
use kpush_fs::HOME_ENV;

/// kpush - push local directories into Kubernetes containers
#[derive(Parser, Debug)]
#[command(name = "kpush")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Descriptor directory or single descriptor file [default: $KPUSH_HOME/config]
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Watch interval in milliseconds
    #[arg(short = 'i', long, global = true, value_name = "MS", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval: u64,

    /// Relative time window, e.g. 2h or 45m
    #[arg(short = 't', long = "time", global = true, value_name = "DURATION")]
    pub time: Option<String>,

    /// Abort when any descriptor fails to load
    #[arg(long, global = true)]
    pub strict: bool,

    /// kpush home directory
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    pub home: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
///
/// Every command takes optional job names (case-insensitive, `.yaml`
/// suffix allowed) to restrict which jobs it applies to.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Push files changed since each job's watermark
    ///
    /// With -t, every watermark is first moved to now minus the window.
    Push {
        /// Jobs to push (default: all)
        jobs: Vec<String>,
    },

    /// Push every file, ignoring watermarks
    PushAll {
        /// Jobs to push (default: all)
        jobs: Vec<String>,
    },

    /// Show what would be pushed since now minus -t (default: everything)
    Test {
        /// Jobs to test (default: all)
        jobs: Vec<String>,
    },

    /// Push continuously, reloading jobs whose descriptor changes
    Watch {
        /// Jobs to watch (default: all)
        jobs: Vec<String>,
    },

    /// Set watermarks to now minus -t (required)
    Touch {
        /// Jobs to touch (default: all)
        jobs: Vec<String>,
    },

    /// Clear watermarks so the next push sends everything
    Reset {
        /// Jobs to reset (default: all)
        jobs: Vec<String>,
    },

    /// Show watermarks; with job names, show full details
    Status {
        /// Jobs to show (default: all)
        jobs: Vec<String>,
    },
}

impl Commands {
    /// Positional job-name filters of any command.
    pub fn jobs(&self) -> &[String] {
        match self {
            Commands::Push { jobs }
            | Commands::PushAll { jobs }
            | Commands::Test { jobs }
            | Commands::Watch { jobs }
            | Commands::Touch { jobs }
            | Commands::Reset { jobs }
            | Commands::Status { jobs } => jobs,
        }
    }
}
