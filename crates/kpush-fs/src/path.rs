//! Path helpers shared by the loader and the state store

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and `~user` forms, are returned unchanged.
/// If no home directory can be determined the input is returned as-is.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        ""
    } else if let Some(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return PathBuf::from(path);
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => {
            tracing::warn!(path, "No home directory found, leaving path unexpanded");
            PathBuf::from(path)
        }
    }
}

/// Check whether a file name ends with `.<extension>`.
///
/// The comparison is case-sensitive, so `job.YAML` is not a descriptor.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
