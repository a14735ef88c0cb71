//! In-memory message history.

use std::num::NonZeroUsize;

use tracing::trace;

use super::{Batch, PageFetcher};
use crate::Record;
use crate::error::Result;

/// A fully materialized history served through [`PageFetcher`].
///
/// Records are kept newest first, so every fetch is a prefix and the
/// monotonic-prefix contract holds by construction. The number of fetch
/// calls is recorded for tests and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
    calls: usize,
}

impl MemorySource {
    /// Creates a source from records in any order.
    ///
    /// Records with equal timestamps keep their relative order.
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { records, calls: 0 }
    }

    /// Total number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of `list_recent` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// The whole history, newest first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl PageFetcher for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
        self.calls += 1;
        let take = limit.get().min(self.records.len());
        trace!(limit = limit.get(), returned = take, "memory fetch");
        Ok(self.records[..take].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(day: u32) -> Record {
        Record::new(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
            .with_body(format!("day {day}"))
    }

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_sorts_newest_first() {
        let source = MemorySource::new(vec![record(1), record(3), record(2)]);
        let days: Vec<_> = source.records().iter().map(|r| r.body.clone()).collect();
        assert_eq!(days, ["day 3", "day 2", "day 1"]);
    }

    #[test]
    fn test_list_recent_prefix() {
        let mut source = MemorySource::new((1..=10).map(record).collect());
        let small = source.list_recent(limit(3)).unwrap();
        let large = source.list_recent(limit(7)).unwrap();
        assert_eq!(small.len(), 3);
        assert_eq!(large.len(), 7);
        assert_eq!(&large[..3], &small[..]);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_list_recent_exhausted() {
        let mut source = MemorySource::new((1..=4).map(record).collect());
        let batch = source.list_recent(limit(100)).unwrap();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_empty_source() {
        let mut source = MemorySource::default();
        assert!(source.is_empty());
        assert!(source.list_recent(limit(5)).unwrap().is_empty());
    }
}
