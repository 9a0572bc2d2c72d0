//! Job-name allow-list

use std::collections::BTreeSet;

/// Suffix stripped from filter arguments so `web.yaml` selects job `web`.
const DESCRIPTOR_SUFFIX: &str = ".YAML";

/// Case-insensitive allow-list of job names.
///
/// An empty filter matches every job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    names: BTreeSet<String>,
}

impl JobFilter {
    /// A filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from CLI arguments.
    ///
    /// Each argument is upper-cased and loses a trailing `.yaml` (in any
    /// case). Arguments that end up empty are ignored.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = args
            .into_iter()
            .map(|arg| {
                let upper = arg.as_ref().trim().to_uppercase();
                match upper.strip_suffix(DESCRIPTOR_SUFFIX) {
                    Some(stem) => stem.to_string(),
                    None => upper,
                }
            })
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || self.names.contains(&name.to_uppercase())
    }

    /// Normalized names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
