use crate::TestRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub resolved: usize,
    pub total: usize,
    pub percent: u8,
}

/// Integer percentage, truncated: 1 of 3 is 33, 2 of 3 is 66. Zero when `total` is zero.
pub fn progress_percent(resolved: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((resolved.min(total) * 100) / total) as u8
}

pub fn progress_of(records: &[TestRecord]) -> Progress {
    let resolved = records.iter().filter(|r| r.status.is_resolved()).count();
    Progress {
        resolved,
        total: records.len(),
        percent: progress_percent(resolved, records.len()),
    }
}
