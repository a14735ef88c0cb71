//! End-to-end window export: discover, reverse, slice.
//!
//! [`export_window`] is the entry point most callers want. It returns an
//! [`ExportReport`] holding the ascending records plus the facts needed to
//! explain the result (how many rounds were needed, whether history ran
//! out before the start date).

use tracing::{info, warn};

use super::discover::{DiscoveryOutcome, WindowDiscoverer};
use super::extract::extract;
use crate::Record;
use crate::config::DiscoveryConfig;
use crate::date::{DateKey, Window};
use crate::error::Result;
use crate::source::PageFetcher;

/// Outcome of one window export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// The requested window.
    pub window: Window,
    /// Records within the window, oldest first.
    pub records: Vec<Record>,
    /// Number of fetch rounds discovery needed.
    pub rounds: usize,
    /// Size of the final fetched batch.
    pub fetched: usize,
    /// Fetch size of the final round.
    pub final_limit: usize,
    /// History ended before the requested start date was reached.
    pub exhausted_before_start: bool,
    /// Date of the oldest record the source returned, if any.
    pub earliest_available: Option<DateKey>,
}

impl ExportReport {
    /// Returns `true` if no record fell within the window.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of exported records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The start date the export actually covers.
    ///
    /// When history was exhausted before the requested start, this is the
    /// date of the earliest available record.
    pub fn effective_start(&self) -> DateKey {
        match self.earliest_available {
            Some(earliest) if self.exhausted_before_start => earliest.max(self.window.start()),
            _ => self.window.start(),
        }
    }
}

/// Exports the records of `window` from `fetcher`.
///
/// # Example
///
/// ```
/// use smsexport::config::DiscoveryConfig;
/// use smsexport::core::pipeline::export_window;
/// use smsexport::date::Window;
/// use smsexport::source::MemorySource;
/// use smsexport::Record;
/// use chrono::{TimeZone, Utc};
///
/// # fn main() -> smsexport::Result<()> {
/// let history = (1..=9)
///     .map(|d| Record::new(Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap()))
///     .collect();
///
/// let window = Window::parse("2024-03-03", "2024-03-05")?;
/// let report = export_window(MemorySource::new(history), window, &DiscoveryConfig::new())?;
///
/// assert_eq!(report.len(), 3);
/// assert_eq!(report.records[0].date_key().to_string(), "2024-03-03");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Any error from [`WindowDiscoverer::discover`].
pub fn export_window<F: PageFetcher>(
    fetcher: F,
    window: Window,
    config: &DiscoveryConfig,
) -> Result<ExportReport> {
    let mut discoverer = WindowDiscoverer::new(fetcher, config.clone());
    run(&mut discoverer, window)
}

/// Validates `start..=end` and exports it.
///
/// An inverted window is rejected before the source is touched.
///
/// # Errors
///
/// [`ExportError::InvalidWindow`](crate::ExportError::InvalidWindow) if
/// `start > end`, otherwise as [`export_window`].
pub fn export_range<F: PageFetcher>(
    fetcher: F,
    start: DateKey,
    end: DateKey,
    config: &DiscoveryConfig,
) -> Result<ExportReport> {
    let window = Window::new(start, end)?;
    export_window(fetcher, window, config)
}

/// Runs one export with a preconfigured discoverer.
///
/// Use this to attach a progress callback or cancel flag.
pub fn run<F: PageFetcher>(
    discoverer: &mut WindowDiscoverer<F>,
    window: Window,
) -> Result<ExportReport> {
    let discovery = discoverer.discover(window.start())?;
    let earliest_available = discovery.oldest();
    let exhausted_before_start = discovery.outcome == DiscoveryOutcome::Exhausted
        && earliest_available.is_none_or(|oldest| oldest > window.start());

    if exhausted_before_start {
        match earliest_available {
            Some(earliest) => warn!(
                requested = %window.start(),
                earliest = %earliest,
                "history ends after the requested start, exporting from the earliest record"
            ),
            None => warn!("message source returned no records"),
        }
    }

    let fetched = discovery.batch.len();
    let records = extract(discovery.batch, &window);
    if records.is_empty() {
        warn!(%window, fetched, "no records within the window");
    } else {
        info!(%window, records = records.len(), fetched, "window extracted");
    }

    Ok(ExportReport {
        window,
        records,
        rounds: discovery.rounds,
        fetched,
        final_limit: discovery.limit,
        exhausted_before_start,
        earliest_available,
    })
}
