//! Validation for job descriptors

use std::path::Path;

use crate::{Error, JobDescriptor, Result};

/// Check the fields a job needs before it can be built.
pub fn validate_descriptor(path: &Path, descriptor: &JobDescriptor) -> Result<()> {
    let invalid = |message: String| Error::InvalidDescriptor {
        path: path.to_path_buf(),
        message,
    };

    validate_name(&descriptor.name).map_err(invalid)?;

    for (field, value) in [
        ("namespace", &descriptor.namespace),
        ("pod", &descriptor.pod),
        ("source", &descriptor.source),
        ("target", &descriptor.target),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("'{field}' must not be empty")));
        }
    }

    if !descriptor.target.starts_with('/') {
        return Err(invalid(format!(
            "'target' must be an absolute path, got '{}'",
            descriptor.target
        )));
    }

    if let Some(poll) = &descriptor.poll {
        humantime::parse_duration(poll)
            .map_err(|e| invalid(format!("'poll' is not a duration ({poll}): {e}")))?;
    }

    Ok(())
}

/// Validate a job name.
///
/// Names become state file names, so they must be non-empty, free of path
/// separators and must not start with a dot.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("'name' must not be empty".into());
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!("'name' must not contain path separators: '{name}'"));
    }
    if name.starts_with('.') {
        return Err(format!("'name' must not start with a dot: '{name}'"));
    }
    Ok(())
}
