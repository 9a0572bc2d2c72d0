//! [`TestHome`] builder for kpush test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary kpush home:
///
/// ```text
/// <root>/
///   config/<job>.yaml   descriptors
///   state/              watermarks
///   src/<job>/          files each job pushes
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use kpush_test_utils::TestHome;
///
/// let home = TestHome::new();
/// let descriptor = home.write_descriptor("web");
/// home.write_source_file("web", "index.html", "<html>");
/// assert!(descriptor.exists());
/// ```
pub struct TestHome {
    temp_dir: TempDir,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create an empty home with `config/` and `state/` directories.
    pub fn new() -> Self {
        let home = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(home.config_dir()).unwrap();
        fs::create_dir_all(home.state_dir()).unwrap();
        home
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root().join("config")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root().join("state")
    }

    /// Source directory of `job`, created on demand.
    pub fn source_dir(&self, job: &str) -> PathBuf {
        let dir = self.root().join("src").join(job);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Path of the descriptor file for `job`.
    pub fn descriptor_path(&self, job: &str) -> PathBuf {
        self.config_dir().join(format!("{job}.yaml"))
    }

    /// Write a valid descriptor for `job` pointing at its source directory.
    pub fn write_descriptor(&self, job: &str) -> PathBuf {
        self.write_descriptor_for(job, job, "default")
    }

    /// Write `<file>.yaml` declaring job `name` in `namespace`.
    pub fn write_descriptor_for(&self, file: &str, name: &str, namespace: &str) -> PathBuf {
        let source = self.source_dir(name);
        let content = format!(
            "name: {name}\nnamespace: {namespace}\npod: {name}-0\nsource: {}\ntarget: /srv/{name}\n",
            source.display()
        );
        self.write_config(&format!("{file}.yaml"), &content)
    }

    /// Write raw content to `config/<file_name>`.
    pub fn write_config(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.config_dir().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a file under `job`'s source directory.
    pub fn write_source_file(&self, job: &str, relative: &str, content: &str) -> PathBuf {
        let path = self.source_dir(job).join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn remove_descriptor(&self, job: &str) {
        fs::remove_file(self.descriptor_path(job)).unwrap();
    }

    /// Assert that a path relative to the home root exists.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }
}
