//! Output format types for the smsexport library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks, plus the timestamped naming of export files.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> smsexport::Result<()> {
//! use smsexport::format::{OutputFormat, write_to_format};
//! use smsexport::Record;
//! use chrono::Utc;
//!
//! let records = vec![Record::new(Utc::now()).with_body("Hello!")];
//!
//! // Write using format enum
//! write_to_format(&records, "export.csv", OutputFormat::Csv)?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("export.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::Record;
use crate::error::ExportError;

/// Layout of export file names, without extension.
pub const EXPORT_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Output format for message exports.
///
/// - [`Csv`](OutputFormat::Csv) - Fixed six-column table (default)
/// - [`Json`](OutputFormat::Json) - Structured array
/// - [`Jsonl`](OutputFormat::Jsonl) - One JSON object per line
///
/// # Example
///
/// ```rust
/// use smsexport::format::OutputFormat;
///
/// assert_eq!(OutputFormat::default(), OutputFormat::Csv);
/// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with a `From,To,Status,Time,Content,Direction` header (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines - one JSON object per line
    ///
    /// Also known as NDJSON.
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Cargo feature that provides the writer for this format.
    pub fn required_feature(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }

    /// Detects the format of an explicit output file from its extension.
    ///
    /// `.ndjson` is accepted as JSON Lines. Anything else, including a
    /// missing extension, is a configuration error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use smsexport::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("export.jsonl").unwrap();
    /// assert_eq!(format, OutputFormat::Jsonl);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(ExportError::config(format!(
                "Cannot infer the output format of '{}': expected a .csv, .json or .jsonl file, or pass --format",
                path.as_ref().display()
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

/// Builds the export file name for a run started at `now`.
///
/// The name is the local timestamp `YYYY-MM-DD_HH-MM-SS` plus the format's
/// extension. Colons are avoided so the name is valid on every platform.
///
/// # Example
///
/// ```rust
/// use smsexport::format::{OutputFormat, export_file_name};
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 42).unwrap();
/// assert_eq!(export_file_name(&now, OutputFormat::Csv), "2024-03-09_17-05-42.csv");
/// ```
pub fn export_file_name<Tz>(now: &DateTime<Tz>, format: OutputFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}.{}", now.format(EXPORT_NAME_FORMAT), format.extension())
}

/// Joins [`export_file_name`] onto `dir`.
pub fn export_path<Tz>(dir: impl AsRef<Path>, now: &DateTime<Tz>, format: OutputFormat) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dir.as_ref().join(export_file_name(now, format))
}

/// Writes records to a file in the specified format.
///
/// This is a convenience function that selects the appropriate writer
/// based on the format enum.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[Record],
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), ExportError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(records, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(records, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(records, path),
        #[allow(unreachable_patterns)]
        _ => Err(unavailable(format)),
    }
}

/// Converts records to a string in the specified format.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "csv-output")]
/// # fn example() -> smsexport::Result<()> {
/// use smsexport::format::{OutputFormat, to_format_string};
///
/// let csv = to_format_string(&[], OutputFormat::Csv)?;
/// assert_eq!(csv.trim_end(), "From,To,Status,Time,Content,Direction");
/// # Ok(())
/// # }
/// ```
#[allow(unused_variables)]
pub fn to_format_string(records: &[Record], format: OutputFormat) -> Result<String, ExportError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(records),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(records),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(records),
        #[allow(unreachable_patterns)]
        _ => Err(unavailable(format)),
    }
}

fn unavailable(format: OutputFormat) -> ExportError {
    ExportError::FormatUnavailable {
        format: match format {
            OutputFormat::Csv => "CSV",
            OutputFormat::Json => "JSON",
            OutputFormat::Jsonl => "JSONL",
        },
        feature: format.required_feature(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path("export.csv").unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::from_path("/path/to/file.JSON").unwrap(),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_path("export.ndjson").unwrap(),
            OutputFormat::Jsonl
        );
        let err = OutputFormat::from_path("export.txt").unwrap_err();
        assert!(matches!(err, ExportError::Config { .. }));
        assert!(err.to_string().contains("export.txt"));
        assert!(OutputFormat::from_path("export").is_err());
    }

    #[test]
    fn test_format_default_and_all() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
        assert_eq!(OutputFormat::all().len(), 3);
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 1).unwrap();
        assert_eq!(
            export_file_name(&now, OutputFormat::Jsonl),
            "2024-12-31_23-59-01.jsonl"
        );
    }

    #[test]
    fn test_export_file_name_uses_given_offset() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(
            export_file_name(&now, OutputFormat::Csv),
            "2024-01-01_02-00-00.csv"
        );
    }

    #[test]
    fn test_export_path() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let path = export_path("out", &now, OutputFormat::Json);
        assert_eq!(path, Path::new("out").join("2024-05-06_07-08-09.json"));
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_to_format_string_csv() {
        let csv = to_format_string(&[], OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("From,To,Status,Time,Content,Direction"));
    }
}
