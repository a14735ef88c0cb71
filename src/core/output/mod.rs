//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_csv`] / [`to_csv`] - CSV table with a fixed header - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of records - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one record per line - requires `json-output` feature
//!
//! Every writer takes records oldest first, as produced by
//! [`export_window`](crate::core::export_window), and writes them in that
//! order. An empty slice is valid: CSV gets a header-only file, JSON an
//! empty array, JSONL an empty file.
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | CSV | Spreadsheets, the traditional export |
//! | JSON | Structured data, re-reading with the file source |
//! | JSONL | Streaming consumers, appending to archives |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> smsexport::Result<()> {
//! use smsexport::core::output::{write_csv, write_json, to_jsonl};
//! use smsexport::Record;
//! use chrono::Utc;
//!
//! let records = vec![
//!     Record::new(Utc::now()).with_from("+15550001111").with_body("Hello!"),
//! ];
//!
//! write_csv(&records, "export.csv")?;
//! write_json(&records, "export.json")?;
//! let jsonl = to_jsonl(&records)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{CSV_HEADER, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

#[cfg(feature = "json-output")]
use serde::Serialize;

#[cfg(feature = "json-output")]
use crate::Record;

/// Timestamp layout used by the JSON writers.
#[cfg(feature = "json-output")]
const JSON_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Shape of one record in JSON and JSONL output.
///
/// Field names match the CSV columns so both exports read the same way.
#[cfg(feature = "json-output")]
#[derive(Serialize)]
struct JsonRecord<'a> {
    from: &'a str,
    to: &'a str,
    status: &'a str,
    time: String,
    content: &'a str,
    direction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sid: Option<&'a str>,
}

#[cfg(feature = "json-output")]
impl<'a> From<&'a Record> for JsonRecord<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            from: &record.from,
            to: &record.to,
            status: &record.status,
            time: record.created_at.format(JSON_TIME_FORMAT).to_string(),
            content: &record.body,
            direction: &record.direction,
            sid: record.sid.as_deref(),
        }
    }
}
