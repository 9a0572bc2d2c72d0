//! Source directory scanning

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use kpush_meta::JobDescriptor;
use walkdir::WalkDir;

/// A regular file under a job's source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the source directory, `/`-separated
    pub relative: String,
    /// Modification time, epoch ms
    pub modified: i64,
}

/// List every non-excluded file under `root`, sorted by relative path.
///
/// Unreadable entries are logged and skipped.
pub fn scan(root: &Path, descriptor: &JobDescriptor) -> Vec<ScannedFile> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || relative_of(root, entry.path())
                    .map(|rel| !descriptor.is_excluded(&rel))
                    .unwrap_or(true)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(job = %descriptor.name, "Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_of(root, entry.path()) else {
            continue;
        };
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        files.push(ScannedFile {
            path: entry.path().to_path_buf(),
            relative,
            modified,
        });
    }
    files
}

fn relative_of(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
