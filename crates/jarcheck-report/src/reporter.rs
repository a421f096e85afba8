use std::path::PathBuf;

use anyhow::{Context, Result};
use jarcheck_core::TestRecord;
use jarcheck_storage::write_snapshot;

use crate::log::render_log;

/// Writes the two export files. Both are overwritten on every export.
#[derive(Clone, Debug)]
pub struct Reporter {
    pub snapshot_path: PathBuf,
    pub log_path: PathBuf,
}

impl Reporter {
    pub fn new(snapshot_path: PathBuf, log_path: PathBuf) -> Self {
        Self { snapshot_path, log_path }
    }

    pub fn export_snapshot(&self, records: &[TestRecord]) -> Result<()> {
        write_snapshot(&self.snapshot_path, records)?;
        tracing::info!(path = %self.snapshot_path.display(), "snapshot exported");
        Ok(())
    }

    pub fn export_log(&self, records: &[TestRecord]) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.log_path, render_log(records))
            .with_context(|| format!("write log {}", self.log_path.display()))?;
        tracing::info!(path = %self.log_path.display(), records = records.len(), "log exported");
        Ok(())
    }
}
