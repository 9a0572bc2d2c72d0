//! File transfer into containers

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::job::Destination;
use crate::{Error, Result};

/// Copies one local file to a path inside a container.
pub trait Transport: Send + Sync {
    fn copy(&self, destination: &Destination, local: &Path, remote: &str) -> Result<()>;
}

/// Transfers files with `kubectl cp`.
///
/// The parent directory is created first with `kubectl exec ... mkdir -p`,
/// since `kubectl cp` does not create it.
#[derive(Debug, Clone)]
pub struct KubectlTransport {
    program: PathBuf,
}

impl Default for KubectlTransport {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl KubectlTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[String]) -> Result<()> {
        tracing::trace!(program = %self.program.display(), ?args, "Running");
        let output = Command::new(&self.program).args(args).output()?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                program: self.program.display().to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Transport for KubectlTransport {
    fn copy(&self, destination: &Destination, local: &Path, remote: &str) -> Result<()> {
        if let Some((parent, _)) = remote.rsplit_once('/').filter(|(p, _)| !p.is_empty()) {
            let mut mkdir = vec![
                "exec".to_string(),
                "-n".to_string(),
                destination.namespace.clone(),
                destination.pod.clone(),
            ];
            if let Some(container) = &destination.container {
                mkdir.extend(["-c".to_string(), container.clone()]);
            }
            mkdir.extend(["--".into(), "mkdir".into(), "-p".into(), parent.to_string()]);
            self.run(&mkdir)?;
        }

        let mut cp = vec![
            "cp".to_string(),
            local.to_string_lossy().into_owned(),
            format!("{}/{}:{}", destination.namespace, destination.pod, remote),
        ];
        if let Some(container) = &destination.container {
            cp.extend(["-c".to_string(), container.clone()]);
        }
        self.run(&cp)
    }
}
