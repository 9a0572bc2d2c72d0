//! Persisted watermarks, one JSON file per job under `<home>/state/`

use std::path::{Path, PathBuf};

use kpush_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
struct WatermarkRecord {
    name: String,
    watermark: i64,
}

/// Reads and writes job watermarks.
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    dir: PathBuf,
    store: ConfigStore,
}

impl WatermarkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Watermark of `job`, `0` if none was ever saved.
    pub fn load(&self, job: &str) -> Result<i64> {
        let path = self.path_for(job);
        if !path.exists() {
            return Ok(0);
        }
        let record: WatermarkRecord = self.store.load(&path)?;
        Ok(record.watermark)
    }

    pub fn save(&self, job: &str, watermark: i64) -> Result<()> {
        let record = WatermarkRecord {
            name: job.to_string(),
            watermark,
        };
        self.store.save(&self.path_for(job), &record)?;
        Ok(())
    }

    fn path_for(&self, job: &str) -> PathBuf {
        self.dir.join(format!("{job}.json"))
    }
}
