//! # smsexport
//!
//! A Rust library for exporting a date-bounded window of message history
//! from a source that can only list its most recent messages.
//!
//! ## Overview
//!
//! Remote SMS APIs such as Twilio's Messages list return the newest `N`
//! messages and nothing else useful for ranges: no date filter, no total
//! count, no seek by date. smsexport still produces an exact
//! `[start, end]` export:
//!
//! 1. **Discover** - fetch the newest `K` records, doubling `K` until the
//!    oldest one is on or before `start` or history runs out
//! 2. **Locate** - reverse the batch to ascending order and binary-search
//!    the CEIL of `start` and the FLOOR of `end`
//! 3. **Slice** - keep the inclusive range between those indices
//! 4. **Export** - write the slice as CSV, JSON or JSONL
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smsexport::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let source = TwilioSource::new(TwilioConfig::from_env()?)?;
//!     let window = Window::parse("2024-01-01", "2024-01-31")?;
//!
//!     let report = export_window(source, window, &DiscoveryConfig::new())?;
//!     if report.exhausted_before_start {
//!         eprintln!("history starts at {}", report.effective_start());
//!     }
//!
//!     write_csv(&report.records, "january.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`source`] - The [`PageFetcher`](source::PageFetcher) trait and its
//!   Twilio, file and in-memory implementations
//! - [`core`] - Discovery, boundary location, extraction and output writers
//!   - [`core::discover`] - [`WindowDiscoverer`](core::WindowDiscoverer)
//!   - [`core::locate`] - [`locate`](core::locate()) with FLOOR/CEIL
//!   - [`core::extract`] - [`extract`](core::extract()) and
//!     [`extract_ascending`](core::extract_ascending)
//!   - [`core::pipeline`] - [`export_window`](core::export_window) and
//!     [`ExportReport`](core::ExportReport)
//!   - [`core::output`] - CSV, JSON and JSONL writers
//! - [`date`] - [`DateKey`](date::DateKey), [`Window`](date::Window) and
//!   the [`Dated`](date::Dated) trait
//! - [`config`] - [`DiscoveryConfig`](config::DiscoveryConfig) and
//!   [`TwilioConfig`](config::TwilioConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and export file naming
//! - [`progress`] - Per-round progress callbacks
//! - [`error`] - Unified error types ([`ExportError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod date;
pub mod error;
pub mod format;
pub mod progress;
pub mod record;
pub mod source;

// Re-export the main types at the crate root for convenience
pub use error::{ExportError, Result};
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use smsexport::prelude::*;
/// ```
pub mod prelude {
    // Core record type
    pub use crate::Record;

    // Error types
    pub use crate::error::{ExportError, Result};

    // Dates and windows
    pub use crate::date::{DateKey, Dated, Window};

    // Configuration
    pub use crate::config::{DiscoveryConfig, TwilioConfig};

    // Sources
    #[cfg(feature = "twilio")]
    pub use crate::source::TwilioSource;
    pub use crate::source::{Batch, JsonFileSource, MemorySource, PageFetcher};

    // Discovery and extraction
    pub use crate::core::{
        Direction, Discovery, DiscoveryOutcome, ExportReport, WindowDiscoverer, export_range,
        export_window, extract, extract_ascending, locate,
    };

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    // Progress
    pub use crate::progress::{Progress, ProgressCallback};
}
