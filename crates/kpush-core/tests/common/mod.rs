//! Mock jobs and transports shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use kpush_core::{Destination, Error, Job, JobFactory, JobStatus, Result, Transport};

/// Something a mock job was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started { name: String, id: u32 },
    Stopped { name: String, id: u32 },
    Touched { name: String, cutoff: i64 },
    Pushed { name: String },
    PushedAll { name: String },
    Tested { name: String, cutoff: i64 },
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A job that records every call in a shared log.
#[derive(Debug)]
pub struct MockJob {
    pub id: u32,
    name: String,
    path: PathBuf,
    content: String,
    namespace: String,
    watermark: i64,
    watching: bool,
    fail_push: bool,
    log: EventLog,
}

impl MockJob {
    /// A job not backed by any file.
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            path: PathBuf::from(format!("/virtual/{name}.yaml")),
            content: String::new(),
            namespace: "default".into(),
            watermark: 0,
            watching: false,
            fail_push: false,
            log: EventLog::default(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Record into `log` instead of a private log.
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_push = true;
        self
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl Job for MockJob {
    fn name(&self) -> &str {
        &self.name
    }

    fn config_file(&self) -> &Path {
        &self.path
    }

    fn last_updated(&self) -> i64 {
        self.watermark
    }

    fn destination(&self) -> Destination {
        Destination {
            namespace: self.namespace.clone(),
            pod: format!("{}-0", self.name),
            container: None,
        }
    }

    fn status(&self) -> JobStatus {
        JobStatus {
            name: self.name.clone(),
            ..JobStatus::default()
        }
    }

    fn touch_time(&mut self, cutoff: i64) -> Result<()> {
        self.watermark = cutoff;
        self.record(Event::Touched {
            name: self.name.clone(),
            cutoff,
        });
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        self.record(Event::Pushed {
            name: self.name.clone(),
        });
        if self.fail_push {
            return Err(Error::Transfer {
                job: self.name.clone(),
                message: "mock failure".into(),
            });
        }
        Ok(())
    }

    fn push_all(&mut self) -> Result<()> {
        self.record(Event::PushedAll {
            name: self.name.clone(),
        });
        Ok(())
    }

    fn test(&mut self, cutoff: i64) -> Result<()> {
        self.record(Event::Tested {
            name: self.name.clone(),
            cutoff,
        });
        Ok(())
    }

    fn start_watch(&mut self) -> Result<()> {
        self.watching = true;
        self.record(Event::Started {
            name: self.name.clone(),
            id: self.id,
        });
        Ok(())
    }

    fn stop_watch(&mut self) {
        self.watching = false;
        self.record(Event::Stopped {
            name: self.name.clone(),
            id: self.id,
        });
    }

    fn config_file_removed(&self) -> bool {
        !self.path.is_file()
    }

    fn config_file_changed(&self) -> bool {
        std::fs::read_to_string(&self.path)
            .map(|current| current != self.content)
            .unwrap_or(false)
    }
}

/// Builds [`MockJob`]s from real descriptor files, numbering each build.
#[derive(Debug, Default)]
pub struct MockFactory {
    pub log: EventLog,
    next_id: RefCell<u32>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn builds(&self) -> u32 {
        *self.next_id.borrow()
    }

    pub fn stop_count(&self, name: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Stopped { name: n, .. } if n == name))
            .count()
    }
}

impl JobFactory for MockFactory {
    type Job = MockJob;

    fn build(&self, path: &Path) -> Result<MockJob> {
        let descriptor = kpush_meta::load_descriptor(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        Ok(MockJob {
            id: *next,
            name: descriptor.name,
            path: path.to_path_buf(),
            content,
            namespace: descriptor.namespace,
            watermark: 0,
            watching: false,
            fail_push: false,
            log: Rc::clone(&self.log),
        })
    }
}

/// A transport that records copies instead of running kubectl.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    copies: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            copies: Mutex::default(),
            fail: true,
        }
    }

    /// Remote paths copied so far, in order.
    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.copies.lock().unwrap().clear();
    }
}

impl Transport for RecordingTransport {
    fn copy(&self, destination: &Destination, _local: &Path, remote: &str) -> Result<()> {
        if self.fail {
            return Err(Error::CommandFailed {
                program: "kubectl".into(),
                code: 1,
                stderr: format!("pod {} not found", destination.pod),
            });
        }
        self.copies.lock().unwrap().push(remote.to_string());
        Ok(())
    }
}

/// A status sink that keeps everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Job names of each rendered snapshot
    pub renders: Vec<Vec<String>>,
    pub notices: Vec<String>,
}

impl kpush_core::StatusSink for RecordingSink {
    fn render(&mut self, rows: &[JobStatus]) {
        self.renders
            .push(rows.iter().map(|r| r.name.clone()).collect());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
