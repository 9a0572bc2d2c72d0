//! Atomic state-file writes

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Replace `path` with `content` in one rename.
///
/// The content goes to a locked temp file next to `path` first. The temp
/// file is removed if any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    fill(&mut temp, path, content)?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

fn fill(temp: &mut NamedTempFile, target: &Path, content: &[u8]) -> Result<()> {
    let locked = |_| Error::LockFailed {
        path: target.to_path_buf(),
    };
    temp.as_file().lock_exclusive().map_err(locked)?;
    temp.write_all(content)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file().unlock().map_err(locked)
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
