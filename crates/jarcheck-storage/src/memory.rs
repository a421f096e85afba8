use std::sync::Mutex;

use jarcheck_core::TestRecord;

use crate::traits::SnapshotStore;

/// In-memory store for tests. Counts saves so callers can assert persistence happened.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    records: Vec<TestRecord>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> anyhow::Result<Vec<TestRecord>> {
        Ok(self.inner.lock().unwrap().records.clone())
    }

    fn save(&self, records: &[TestRecord]) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.records = records.to_vec();
        inner.saves += 1;
        Ok(())
    }
}
