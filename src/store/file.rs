//! JSON files on disk, one directory per run.

use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{upsert_outcomes, RunStore};
use crate::checks::CheckOutcome;
use crate::error::{LaunchproofError, Result};
use crate::lifecycle::{RunId, RunRecord, RunSummary};

const RUN_FILE: &str = "run.json";
const OUTCOMES_FILE: &str = "outcomes.json";

/// Stores each run under `<root>/<run id>/` as `run.json` and
/// `outcomes.json`.
pub struct FileRunStore {
    root: PathBuf,
    // Serializes read-modify-write cycles between the two phases.
    lock: Mutex<()>,
}

impl FileRunStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the store path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    fn run_dir(&self, id: &RunId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create run store at {:?}", dir))?;
        Ok(())
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize run data")?;
        fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    fn read_record(&self, id: &RunId) -> Result<RunRecord> {
        let path = self.run_dir(id).join(RUN_FILE);
        if !path.exists() {
            return Err(LaunchproofError::RunNotFound { id: id.to_string() });
        }
        let json = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let record: RunRecord = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse run record {:?}", path))?;
        Ok(record)
    }

    fn read_outcomes(&self, id: &RunId) -> Result<Vec<CheckOutcome>> {
        let path = self.run_dir(id).join(OUTCOMES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let outcomes: Vec<CheckOutcome> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse outcomes {:?}", path))?;
        Ok(outcomes)
    }

    fn update_record(
        &self,
        id: &RunId,
        f: impl FnOnce(&mut RunRecord) -> Result<()>,
    ) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut record = self.read_record(id)?;
        f(&mut record)?;
        self.write_json(&self.run_dir(id).join(RUN_FILE), &record)
    }
}

impl RunStore for FileRunStore {
    fn create_run(&self, record: &RunRecord) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let dir = self.run_dir(&record.id);
        self.ensure_dir(&dir)?;
        self.write_json(&dir.join(RUN_FILE), record)
    }

    fn write_outcomes(&self, run_id: &RunId, outcomes: &[CheckOutcome]) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if !self.run_dir(run_id).join(RUN_FILE).exists() {
            return Err(LaunchproofError::RunNotFound {
                id: run_id.to_string(),
            });
        }
        let mut stored = self.read_outcomes(run_id)?;
        upsert_outcomes(&mut stored, outcomes);
        self.write_json(&self.run_dir(run_id).join(OUTCOMES_FILE), &stored)
    }

    fn update_run_summary(&self, run_id: &RunId, summary: &RunSummary) -> Result<()> {
        self.update_record(run_id, |record| record.apply_summary(summary, Utc::now()))
    }

    fn mark_failed(&self, run_id: &RunId, message: &str) -> Result<()> {
        self.update_record(run_id, |record| record.fail(message, Utc::now()))
    }

    fn load_run(&self, run_id: &RunId) -> Result<RunRecord> {
        self.read_record(run_id)
    }

    fn load_outcomes(&self, run_id: &RunId) -> Result<Vec<CheckOutcome>> {
        if !self.run_dir(run_id).join(RUN_FILE).exists() {
            return Err(LaunchproofError::RunNotFound {
                id: run_id.to_string(),
            });
        }
        self.read_outcomes(run_id)
    }

    fn list_runs(&self) -> Result<Vec<RunRecord>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path().join(RUN_FILE);
            if let Ok(json) = fs::read_to_string(&path) {
                match serde_json::from_str::<RunRecord>(&json) {
                    Ok(record) => runs.push(record),
                    Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable run: {}", e),
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }
}
