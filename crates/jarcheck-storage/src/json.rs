use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jarcheck_core::TestRecord;
use serde::Serialize;

use crate::traits::SnapshotStore;

/// `output.json` on disk: a JSON array of records, indented by four spaces.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub fn to_indented_json(records: &[TestRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    records.serialize(&mut ser).context("serialize snapshot")?;
    Ok(buf)
}

pub fn write_snapshot(path: &Path, records: &[TestRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let bytes = to_indented_json(records)?;
    std::fs::write(path, bytes).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Vec<TestRecord>> {
        let bytes = std::fs::read(&self.path).with_context(|| format!("read snapshot {}", self.path.display()))?;
        let records: Vec<TestRecord> =
            serde_json::from_slice(&bytes).with_context(|| format!("parse snapshot {}", self.path.display()))?;
        Ok(records)
    }

    fn save(&self, records: &[TestRecord]) -> Result<()> {
        write_snapshot(&self.path, records)?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "snapshot written");
        Ok(())
    }
}
