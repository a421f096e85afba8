use std::collections::HashSet;

use crate::{progress_of, Progress, RegistryError, TestRecord, TestStatus};

/// Ordered test records plus the transient cursor of the active test.
///
/// The cursor is process-local: it is never serialized and a restored
/// registry starts without an active test.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    records: Vec<TestRecord>,
    current: Option<usize>,
}

impl Registry {
    /// Fresh registry from scanned artifact names: sorted, deduplicated, all Pending.
    pub fn from_artifacts<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self {
            records: names.into_iter().map(TestRecord::pending).collect(),
            current: None,
        }
    }

    /// Restore from a persisted snapshot, keeping the snapshot's order.
    pub fn from_records(records: Vec<TestRecord>) -> Result<Self, RegistryError> {
        {
            let mut seen = HashSet::new();
            for r in &records {
                if !seen.insert(r.artifact_name.as_str()) {
                    return Err(RegistryError::DuplicateArtifact(r.artifact_name.clone()));
                }
            }
        }
        Ok(Self { records, current: None })
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_record(&self) -> Option<&TestRecord> {
        self.current.and_then(|i| self.records.get(i))
    }

    /// Put the cursor on the first record, whatever its status.
    pub fn begin(&mut self) -> Result<usize, RegistryError> {
        if self.records.is_empty() {
            return Err(RegistryError::Empty);
        }
        self.current = Some(0);
        Ok(0)
    }

    pub fn record_verdict(&mut self, index: usize, status: TestStatus, notes: impl Into<String>) -> Result<(), RegistryError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(RegistryError::IndexOutOfRange { index, len })?;
        record.status = status;
        record.notes = notes.into();
        Ok(())
    }

    /// Verdict for the record under the cursor.
    pub fn record_current_verdict(&mut self, status: TestStatus, notes: impl Into<String>) -> Result<usize, RegistryError> {
        let index = self.current.ok_or(RegistryError::NoActiveTest)?;
        self.record_verdict(index, status, notes)?;
        Ok(index)
    }

    /// Index of the next Pending record after the cursor, wrapping around.
    ///
    /// Exactly `len` candidates are examined, so the cursor's own position is
    /// revisited once, last.
    pub fn next_pending_index(&self) -> Option<usize> {
        let len = self.records.len();
        if len == 0 {
            return None;
        }
        let start = self.current.map(|i| i + 1).unwrap_or(0);
        (0..len)
            .map(|step| (start + step) % len)
            .find(|&i| self.records[i].status == TestStatus::Pending)
    }

    /// Move the cursor to the next Pending record. The cursor is untouched on error.
    pub fn advance(&mut self) -> Result<usize, RegistryError> {
        let next = self.next_pending_index().ok_or(RegistryError::NoPendingTests)?;
        self.current = Some(next);
        Ok(next)
    }

    pub fn progress(&self) -> Progress {
        progress_of(&self.records)
    }
}
