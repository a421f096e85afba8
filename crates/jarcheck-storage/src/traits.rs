use std::sync::Arc;

use jarcheck_core::TestRecord;

/// Persistence of full registry snapshots. Every save replaces the previous snapshot.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Vec<TestRecord>>;
    fn save(&self, records: &[TestRecord]) -> anyhow::Result<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Arc<T> {
    fn load(&self) -> anyhow::Result<Vec<TestRecord>> {
        (**self).load()
    }

    fn save(&self, records: &[TestRecord]) -> anyhow::Result<()> {
        (**self).save(records)
    }
}
