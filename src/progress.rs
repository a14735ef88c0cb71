//! Progress reporting for window discovery.
//!
//! Discovery may take several round trips to a slow remote source. This
//! module provides a callback-based mechanism so callers get a push-based
//! update after every fetch round.
//!
//! # Example
//!
//! ```rust
//! use smsexport::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!("round {}: {} of {} records", progress.round, progress.fetched, progress.requested);
//! });
//!
//! callback(Progress::new(1, 50, 50));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::date::DateKey;

/// State of discovery after one fetch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// 1-based round number.
    pub round: usize,

    /// Fetch size requested in this round.
    pub requested: usize,

    /// Number of records the source returned.
    pub fetched: usize,

    /// Date of the oldest record returned, if any.
    pub oldest: Option<DateKey>,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(round: usize, requested: usize, fetched: usize) -> Self {
        Self {
            round,
            requested,
            fetched,
            oldest: None,
        }
    }

    /// Sets the oldest date seen in this round.
    #[must_use]
    pub fn with_oldest(mut self, oldest: DateKey) -> Self {
        self.oldest = Some(oldest);
        self
    }

    /// Returns `true` if the source returned fewer records than requested.
    pub fn is_exhausted(&self) -> bool {
        self.fetched < self.requested
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {}: fetched {}/{}", self.round, self.fetched, self.requested)?;
        if let Some(oldest) = self.oldest {
            write!(f, " (oldest {})", oldest)?;
        }
        if self.is_exhausted() {
            write!(f, ", end of history")?;
        }
        Ok(())
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints one line per round to stderr.
///
/// # Example
///
/// ```rust
/// use smsexport::progress::{stderr_progress, Progress};
///
/// let callback = stderr_progress();
/// // Prints "   round 2: fetched 60/100 (oldest 2024-01-07), end of history"
/// callback(Progress::new(2, 100, 60).with_oldest(20240107.into()));
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| eprintln!("   {}", progress))
}
