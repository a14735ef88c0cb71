//! Growing the fetch size until the window start is buffered.
//!
//! A most-recent-only source cannot be asked for "everything since March".
//! [`WindowDiscoverer`] instead asks for the newest `K` records, looks at
//! the oldest one, and doubles `K` until that record is on or before the
//! requested start date or the source runs out of history.
//!
//! Doubling keeps the number of round trips logarithmic in the depth of
//! the window at the cost of re-fetching earlier pages. Every round fully
//! replaces the previous batch; nothing is merged.
//!
//! # Example
//!
//! ```
//! use smsexport::config::DiscoveryConfig;
//! use smsexport::core::discover::{DiscoveryOutcome, WindowDiscoverer};
//! use smsexport::source::MemorySource;
//! use smsexport::Record;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! # fn main() -> smsexport::Result<()> {
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let history: Vec<Record> = (0..100).map(|d| Record::new(base + Duration::days(d))).collect();
//!
//! let mut discoverer = WindowDiscoverer::new(
//!     MemorySource::new(history),
//!     DiscoveryConfig::new().with_initial_limit(10),
//! );
//! let discovery = discoverer.discover(smsexport::date::DateKey::parse("2024-02-15")?)?;
//!
//! assert_eq!(discovery.outcome, DiscoveryOutcome::Covered);
//! assert_eq!(discovery.limit, 80);
//! assert_eq!(discovery.rounds, 4);
//! # Ok(())
//! # }
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::Record;
use crate::config::DiscoveryConfig;
use crate::date::DateKey;
use crate::error::{ExportError, Result};
use crate::progress::{Progress, ProgressCallback, no_progress};
use crate::source::{Batch, PageFetcher};

/// Why discovery stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryOutcome {
    /// The oldest fetched record is on or before the start date.
    Covered,
    /// The source ran out of history before reaching the start date.
    Exhausted,
}

/// Result of a successful discovery.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// The final batch, newest first.
    pub batch: Batch,
    /// Why discovery stopped.
    pub outcome: DiscoveryOutcome,
    /// Number of fetch rounds performed.
    pub rounds: usize,
    /// Fetch size of the final round.
    pub limit: usize,
}

impl Discovery {
    /// Date of the oldest record in the batch.
    pub fn oldest(&self) -> Option<DateKey> {
        self.batch.last().map(Record::date_key)
    }

    /// Date of the newest record in the batch.
    pub fn newest(&self) -> Option<DateKey> {
        self.batch.first().map(Record::date_key)
    }

    /// Returns `true` if history ended before the start date was reached.
    pub fn is_exhausted(&self) -> bool {
        self.outcome == DiscoveryOutcome::Exhausted
    }
}

/// Drives a [`PageFetcher`] until the requested start date is buffered.
pub struct WindowDiscoverer<F> {
    fetcher: F,
    config: DiscoveryConfig,
    progress: ProgressCallback,
    cancel: Option<Arc<AtomicBool>>,
}

impl<F: PageFetcher> WindowDiscoverer<F> {
    /// Creates a discoverer over `fetcher`.
    pub fn new(fetcher: F, config: DiscoveryConfig) -> Self {
        Self {
            fetcher,
            config,
            progress: no_progress(),
            cancel: None,
        }
    }

    /// Installs a callback invoked after every fetch round.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Installs a flag that aborts discovery before the next fetch once set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The discovery configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// The wrapped source.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Unwraps the source.
    pub fn into_inner(self) -> F {
        self.fetcher
    }

    /// Fetches until the oldest buffered record is on or before `start`.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Config`] if the configuration is unusable
    /// - [`ExportError::UnboundedGrowth`] if `max_rounds` or `max_limit`
    ///   is reached without covering `start`
    /// - [`ExportError::Cancelled`] if the deadline passes or the cancel
    ///   flag is set between fetches
    /// - [`ExportError::SourceContract`] if a batch is out of order, too
    ///   long, or shorter than an earlier one
    /// - any error returned by the source
    pub fn discover(&mut self, start: DateKey) -> Result<Discovery> {
        self.config.validate()?;
        let started = Instant::now();
        let mut limit = self.config.initial_limit;
        let mut rounds = 0usize;
        let mut previous_len = 0usize;

        loop {
            if rounds >= self.config.max_rounds {
                return Err(ExportError::UnboundedGrowth { limit, rounds });
            }
            self.check_cancelled(started, rounds)?;

            let requested = NonZeroUsize::new(limit)
                .ok_or_else(|| ExportError::config("fetch size must be positive"))?;
            let batch = self.fetcher.list_recent(requested)?;
            rounds += 1;
            check_batch(&batch, limit, previous_len)?;

            let oldest = batch.last().map(Record::date_key);
            let mut progress = Progress::new(rounds, limit, batch.len());
            if let Some(oldest) = oldest {
                progress = progress.with_oldest(oldest);
            }
            (self.progress)(progress);
            debug!(
                source = self.fetcher.name(),
                round = rounds,
                limit,
                returned = batch.len(),
                oldest = ?oldest.map(DateKey::value),
                "fetched batch"
            );

            if oldest.is_some_and(|oldest| oldest <= start) {
                if start_day_may_be_partial(&batch, limit, start) {
                    debug!(
                        start = start.value(),
                        limit,
                        "batch ends inside the start day; earlier records of that day are not fetched"
                    );
                }
                info!(rounds, limit, records = batch.len(), "window start covered");
                return Ok(Discovery {
                    batch,
                    outcome: DiscoveryOutcome::Covered,
                    rounds,
                    limit,
                });
            }

            if batch.len() < limit {
                info!(rounds, limit, records = batch.len(), "source history exhausted");
                return Ok(Discovery {
                    batch,
                    outcome: DiscoveryOutcome::Exhausted,
                    rounds,
                    limit,
                });
            }

            if limit >= self.config.max_limit {
                return Err(ExportError::UnboundedGrowth { limit, rounds });
            }
            previous_len = batch.len();
            limit = limit.saturating_mul(2).min(self.config.max_limit);
        }
    }

    fn check_cancelled(&self, started: Instant, rounds: usize) -> Result<()> {
        let flagged = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self
            .config
            .deadline
            .is_some_and(|deadline| started.elapsed() >= deadline);
        if flagged || expired {
            return Err(ExportError::Cancelled { rounds });
        }
        Ok(())
    }
}

/// A full batch whose oldest record falls on `start` may have cut that day short.
fn start_day_may_be_partial(batch: &[Record], limit: usize, start: DateKey) -> bool {
    batch.len() == limit && batch.last().map(Record::date_key) == Some(start)
}

/// Verifies the source contract on one batch.
fn check_batch(batch: &[Record], limit: usize, previous_len: usize) -> Result<()> {
    if batch.len() > limit {
        return Err(ExportError::source_contract(format!(
            "returned {} records for a fetch of {}",
            batch.len(),
            limit
        )));
    }
    if batch.len() < previous_len {
        return Err(ExportError::source_contract(format!(
            "returned {} records after an earlier, smaller fetch returned {}",
            batch.len(),
            previous_len
        )));
    }
    if let Some(pos) = batch
        .windows(2)
        .position(|pair| pair[0].created_at < pair[1].created_at)
    {
        return Err(ExportError::source_contract(format!(
            "records {} and {} are not newest first",
            pos,
            pos + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Mutex;
    use std::time::Duration as StdDuration;

    /// One record per day starting 2024-01-01.
    fn daily(count: i64) -> Vec<Record> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        (0..count).map(|d| Record::new(base + Duration::days(d))).collect()
    }

    fn day(d: u32) -> DateKey {
        DateKey::new(20240100 + d as i32)
    }

    /// Source that ignores the limit and always returns the same records.
    struct Stuck(Vec<Record>);

    impl PageFetcher for Stuck {
        fn name(&self) -> &'static str {
            "stuck"
        }

        fn list_recent(&mut self, _limit: NonZeroUsize) -> Result<Batch> {
            Ok(self.0.clone())
        }
    }

    /// Source that replays fixed batches, one per call.
    struct Scripted(Vec<Batch>);

    impl PageFetcher for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn list_recent(&mut self, _limit: NonZeroUsize) -> Result<Batch> {
            Ok(self.0.remove(0))
        }
    }

    /// Source that always fills the request with records from the same day.
    struct Endless;

    impl PageFetcher for Endless {
        fn name(&self) -> &'static str {
            "endless"
        }

        fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
            let ts = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            Ok(vec![Record::new(ts); limit.get()])
        }
    }

    #[test]
    fn test_first_round_sufficient() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(30)),
            DiscoveryConfig::new().with_initial_limit(50),
        );
        let discovery = discoverer.discover(day(10)).unwrap();
        assert_eq!(discovery.rounds, 1);
        assert_eq!(discovery.outcome, DiscoveryOutcome::Covered);
        assert_eq!(discovery.batch.len(), 30);
    }

    #[test]
    fn test_doubles_until_covered() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(31)),
            DiscoveryConfig::new().with_initial_limit(4),
        );
        // Needs the 26 newest records: 4 -> 8 -> 16 -> 32
        let discovery = discoverer.discover(day(6)).unwrap();
        assert_eq!(discovery.rounds, 4);
        assert_eq!(discovery.limit, 32);
        assert_eq!(discovery.outcome, DiscoveryOutcome::Covered);
        assert!(discovery.oldest().unwrap() <= day(6));
        assert_eq!(discoverer.fetcher().calls(), 4);
    }

    #[test]
    fn test_stops_on_exact_boundary() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(31)),
            DiscoveryConfig::new().with_initial_limit(8),
        );
        // The 8 newest records are Jan 24..=31
        let discovery = discoverer.discover(day(24)).unwrap();
        assert_eq!(discovery.rounds, 1);
        assert_eq!(discovery.oldest(), Some(day(24)));
    }

    #[test]
    fn test_exhaustion() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(30)),
            DiscoveryConfig::new().with_initial_limit(8),
        );
        let discovery = discoverer.discover(DateKey::new(20231201)).unwrap();
        assert!(discovery.is_exhausted());
        assert_eq!(discovery.batch.len(), 30);
        assert_eq!(discovery.limit, 32);
        assert_eq!(discovery.oldest(), Some(day(1)));
    }

    #[test]
    fn test_exhaustion_on_exact_multiple() {
        // 32 records: the 32-fetch is full, the 64-fetch reveals the end.
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(32)),
            DiscoveryConfig::new().with_initial_limit(8),
        );
        let discovery = discoverer.discover(DateKey::new(20231201)).unwrap();
        assert!(discovery.is_exhausted());
        assert_eq!(discovery.limit, 64);
        assert_eq!(discovery.batch.len(), 32);
    }

    #[test]
    fn test_empty_source_is_exhausted() {
        let mut discoverer =
            WindowDiscoverer::new(MemorySource::default(), DiscoveryConfig::default());
        let discovery = discoverer.discover(day(1)).unwrap();
        assert!(discovery.is_exhausted());
        assert!(discovery.batch.is_empty());
        assert_eq!(discovery.rounds, 1);
    }

    #[test]
    fn test_round_cap() {
        let mut discoverer = WindowDiscoverer::new(
            Endless,
            DiscoveryConfig::new().with_initial_limit(1).with_max_rounds(5),
        );
        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnboundedGrowth {
                rounds: 5,
                limit: 32
            }
        ));
    }

    #[test]
    fn test_limit_cap_clamps_then_fails() {
        let mut discoverer = WindowDiscoverer::new(
            Endless,
            DiscoveryConfig::new()
                .with_initial_limit(10)
                .with_max_limit(25),
        );
        // 10 -> 20 -> 25 (clamped) -> fail
        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnboundedGrowth {
                limit: 25,
                rounds: 3
            }
        ));
    }

    #[test]
    fn test_limit_cap_reached_with_covering_batch() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(31)),
            DiscoveryConfig::new()
                .with_initial_limit(10)
                .with_max_limit(25),
        );
        let discovery = discoverer.discover(day(7)).unwrap();
        assert_eq!(discovery.limit, 25);
        assert_eq!(discovery.oldest(), Some(day(7)));
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut discoverer =
            WindowDiscoverer::new(MemorySource::new(daily(10)), DiscoveryConfig::default())
                .with_cancel_flag(flag);
        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(matches!(err, ExportError::Cancelled { rounds: 0 }));
        assert_eq!(discoverer.fetcher().calls(), 0);
    }

    #[test]
    fn test_zero_deadline_cancels() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(10)),
            DiscoveryConfig::new().with_deadline(StdDuration::ZERO),
        );
        assert!(matches!(
            discoverer.discover(day(1)),
            Err(ExportError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_invalid_config_fetches_nothing() {
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(10)),
            DiscoveryConfig::new().with_initial_limit(0),
        );
        assert!(matches!(
            discoverer.discover(day(1)),
            Err(ExportError::Config { .. })
        ));
        assert_eq!(discoverer.fetcher().calls(), 0);
    }

    #[test]
    fn test_rejects_oversized_batch() {
        let mut discoverer = WindowDiscoverer::new(
            Stuck(daily(5).into_iter().rev().collect()),
            DiscoveryConfig::new().with_initial_limit(2),
        );
        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(matches!(err, ExportError::SourceContract { .. }));
    }

    #[test]
    fn test_rejects_unordered_batch() {
        let mut discoverer = WindowDiscoverer::new(
            Stuck(daily(5)),
            DiscoveryConfig::new().with_initial_limit(10),
        );
        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(err.to_string().contains("not newest first"));
    }

    #[test]
    fn test_rejects_batch_shorter_than_previous_round() {
        let newest_first: Vec<Record> = daily(10).into_iter().rev().collect();
        let mut discoverer = WindowDiscoverer::new(
            Scripted(vec![newest_first[..4].to_vec(), newest_first[..2].to_vec()]),
            DiscoveryConfig::new().with_initial_limit(4),
        );

        let err = discoverer.discover(day(1)).unwrap_err();
        assert!(matches!(err, ExportError::SourceContract { .. }));
        assert!(err.to_string().contains("earlier, smaller fetch"));
    }

    #[test]
    fn test_start_day_may_be_partial() {
        let newest_first: Vec<Record> = daily(5).into_iter().rev().collect();
        // full batch ending on the start day
        assert!(start_day_may_be_partial(&newest_first[..3], 3, day(3)));
        // batch reached the day before start
        assert!(!start_day_may_be_partial(&newest_first[..4], 4, day(3)));
        // short batch means history ended, nothing was cut
        assert!(!start_day_may_be_partial(&newest_first[..3], 10, day(3)));
    }

    #[test]
    fn test_progress_reported_each_round() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut discoverer = WindowDiscoverer::new(
            MemorySource::new(daily(31)),
            DiscoveryConfig::new().with_initial_limit(4),
        )
        .with_progress(Arc::new(move |p| sink.lock().unwrap().push(p)));

        discoverer.discover(day(6)).unwrap();

        let seen = seen.lock().unwrap();
        let requested: Vec<_> = seen.iter().map(|p| p.requested).collect();
        assert_eq!(requested, [4, 8, 16, 32]);
        assert_eq!(seen.last().unwrap().oldest, Some(day(1)));
    }
}
