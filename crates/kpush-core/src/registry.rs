//! The registry of active jobs

use crate::job::{Job, JobStatus};
use crate::{Error, Result};

/// Name-sorted, duplicate-free collection of active jobs.
///
/// Every mutation keeps the jobs sorted ascending by name (case-sensitive),
/// so iteration order is the order commands visit jobs in.
#[derive(Debug)]
pub struct JobRegistry<J> {
    jobs: Vec<J>,
}

impl<J> Default for JobRegistry<J> {
    fn default() -> Self {
        Self { jobs: Vec::new() }
    }
}

impl<J: Job> JobRegistry<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from jobs in any order.
    ///
    /// Fails with [`Error::DuplicateJob`] if two jobs share a name.
    pub fn from_jobs(mut jobs: Vec<J>) -> Result<Self> {
        jobs.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = jobs.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(duplicate(&pair[0], &pair[1]));
        }
        Ok(Self { jobs })
    }

    /// Insert a job at its sorted position.
    pub fn insert(&mut self, job: J) -> Result<()> {
        match self.position(job.name()) {
            Ok(idx) => Err(duplicate(&self.jobs[idx], &job)),
            Err(idx) => {
                self.jobs.insert(idx, job);
                Ok(())
            }
        }
    }

    /// Remove and return the job called `name`.
    pub fn remove(&mut self, name: &str) -> Option<J> {
        let idx = self.position(name).ok()?;
        Some(self.jobs.remove(idx))
    }

    /// Put `job` in place of any job with the same name, returning the old one.
    pub fn replace(&mut self, job: J) -> Option<J> {
        match self.position(job.name()) {
            Ok(idx) => Some(std::mem::replace(&mut self.jobs[idx], job)),
            Err(idx) => {
                self.jobs.insert(idx, job);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&J> {
        self.position(name).ok().map(|idx| &self.jobs[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut J> {
        self.position(name).ok().map(|idx| &mut self.jobs[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, J> {
        self.jobs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, J> {
        self.jobs.iter_mut()
    }

    /// Job names in registry order.
    pub fn names(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.name().to_string()).collect()
    }

    /// Status rows in registry order.
    pub fn snapshot(&self) -> Vec<JobStatus> {
        self.jobs.iter().map(Job::status).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn into_jobs(self) -> Vec<J> {
        self.jobs
    }

    fn position(&self, name: &str) -> std::result::Result<usize, usize> {
        self.jobs.binary_search_by(|j| j.name().cmp(name))
    }
}

impl<'a, J: Job> IntoIterator for &'a JobRegistry<J> {
    type Item = &'a J;
    type IntoIter = std::slice::Iter<'a, J>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn duplicate<J: Job>(first: &J, second: &J) -> Error {
    Error::DuplicateJob {
        name: first.name().to_string(),
        first: first.config_file().to_path_buf(),
        second: second.config_file().to_path_buf(),
    }
}
