//! Remote message sources.
//!
//! The only capability smsexport needs from a source is "give me the N most
//! recent records", expressed by [`PageFetcher`]. Everything else (range
//! location, slicing, export) happens locally.
//!
//! # Implementations
//!
//! | Source | Type | Feature |
//! |--------|------|---------|
//! | In-memory history | [`MemorySource`] | always |
//! | JSON / JSONL dump | [`JsonFileSource`] | always |
//! | Twilio Messages API | [`TwilioSource`] | `twilio` |
//!
//! # Contract
//!
//! A conforming source returns at most `limit` records, newest first, and
//! the result of a smaller fetch is a prefix of the result of a larger one.
//! Returning fewer than `limit` records means history is exhausted.

use std::num::NonZeroUsize;

use crate::Record;
use crate::error::Result;

mod file;
mod memory;
#[cfg(feature = "twilio")]
mod twilio;

pub use file::JsonFileSource;
pub use memory::MemorySource;
#[cfg(feature = "twilio")]
pub use twilio::TwilioSource;

/// One fetch result: records ordered newest first.
pub type Batch = Vec<Record>;

/// A source that can list its most recent records.
///
/// # Examples
///
/// ```
/// use smsexport::source::{MemorySource, PageFetcher};
/// use smsexport::Record;
/// use chrono::{TimeZone, Utc};
/// use std::num::NonZeroUsize;
///
/// # fn main() -> smsexport::Result<()> {
/// let mut source = MemorySource::new(vec![
///     Record::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
///     Record::new(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()),
/// ]);
///
/// let batch = source.list_recent(NonZeroUsize::new(1).unwrap())?;
/// assert_eq!(batch.len(), 1);
/// assert_eq!(batch[0].date_key().value(), 20240102);
/// # Ok(())
/// # }
/// ```
pub trait PageFetcher {
    /// Returns the human-readable name of this source.
    fn name(&self) -> &'static str;

    /// Requests the `limit` most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SourceUnavailable`](crate::ExportError::SourceUnavailable)
    /// if the source cannot be reached.
    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &mut F {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
        (**self).list_recent(limit)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
        (**self).list_recent(limit)
    }
}
