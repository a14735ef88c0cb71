//! Core export logic for smsexport.
//!
//! This module contains:
//! - [`discover`] - Doubling fetch-size discovery of the window start
//! - [`locate`] - FLOOR/CEIL boundary search over ascending sequences
//! - [`extract`] - Slicing a fetched batch down to a window
//! - [`pipeline`] - The composed export with its report
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use smsexport::core::{export_window, ExportReport};
//! use smsexport::config::DiscoveryConfig;
//! use smsexport::date::Window;
//! use smsexport::source::MemorySource;
//!
//! # fn main() -> smsexport::Result<()> {
//! let window = Window::parse("2024-01-01", "2024-01-31")?;
//! let report: ExportReport = export_window(MemorySource::default(), window, &DiscoveryConfig::new())?;
//! assert!(report.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod discover;
pub mod extract;
pub mod locate;
pub mod output;
pub mod pipeline;

// Re-export main types for convenience
pub use discover::{Discovery, DiscoveryOutcome, WindowDiscoverer};
pub use extract::{extract, extract_ascending};
pub use locate::{Direction, locate};
pub use pipeline::{ExportReport, export_range, export_window};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
