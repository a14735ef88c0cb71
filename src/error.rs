//! Unified error types for smsexport.
//!
//! This module provides a single [`ExportError`] enum that covers every
//! fatal condition in the library: source failures, bad windows, runaway
//! discovery and output problems.
//!
//! Recoverable outcomes (history exhausted before the start date, an empty
//! window) are deliberately *not* errors. They are reported through
//! [`ExportReport`](crate::core::ExportReport) so the run still produces an
//! export.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::date::DateKey;

/// A specialized [`Result`] type for smsexport operations.
///
/// # Example
///
/// ```rust
/// use smsexport::error::Result;
/// use smsexport::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;

/// Boxed transport error carried by [`ExportError::SourceUnavailable`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for all smsexport operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// The remote source could not serve a fetch.
    ///
    /// Covers network failures, authentication errors and rate limiting
    /// that outlived the transport's retries. `limit` is the fetch size
    /// that was being requested.
    #[error("Message source unavailable while fetching {limit} records: {source}")]
    SourceUnavailable {
        /// The fetch size that failed
        limit: usize,
        /// The underlying transport error
        #[source]
        source: BoxError,
    },

    /// The requested window ends before it starts.
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        /// Requested start date
        start: DateKey,
        /// Requested end date
        end: DateKey,
    },

    /// Discovery kept doubling without reaching the start date.
    ///
    /// Distinguishes a misbehaving or enormous source from ordinary
    /// exhaustion.
    #[error("Discovery exceeded its limits after {rounds} rounds (fetch size {limit})")]
    UnboundedGrowth {
        /// The last fetch size that was reached
        limit: usize,
        /// Number of fetch rounds performed
        rounds: usize,
    },

    /// Discovery was stopped by its deadline or cancel flag.
    #[error("Discovery cancelled after {rounds} rounds")]
    Cancelled {
        /// Number of fetch rounds completed before cancellation
        rounds: usize,
    },

    /// A fetched batch broke the source's ordering or prefix contract.
    #[error("Message source broke its contract: {message}")]
    SourceContract {
        /// Description of the violation
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date string.
    ///
    /// Dates are expected in YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A record or input file could not be parsed.
    #[error("Failed to parse {format}{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// What was being parsed (e.g. "records JSON", "Twilio date")
        format: &'static str,
        /// Description of the failure
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The output format requires a feature that is not compiled in.
    #[error("Output format {format} requires the '{feature}' feature to be enabled")]
    FormatUnavailable {
        /// Format display name
        format: &'static str,
        /// Cargo feature that enables it
        feature: &'static str,
    },
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ExportError::Parse {
            format: "output",
            message: err.to_string(),
            path: None,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ExportError {
    /// Creates a source-unavailable error for the given fetch size.
    pub fn source_unavailable(limit: usize, source: impl Into<BoxError>) -> Self {
        ExportError::SourceUnavailable {
            limit,
            source: source.into(),
        }
    }

    /// Creates a source contract violation error.
    pub fn source_contract(message: impl Into<String>) -> Self {
        ExportError::SourceContract {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ExportError::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ExportError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a parse error without a file path.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        ExportError::Parse {
            format,
            message: message.into(),
            path: None,
        }
    }

    /// Returns `true` if the remote source failed.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, ExportError::SourceUnavailable { .. })
    }

    /// Returns `true` if the window was rejected.
    pub fn is_invalid_window(&self) -> bool {
        matches!(self, ExportError::InvalidWindow { .. })
    }

    /// Returns `true` if discovery hit its growth caps.
    pub fn is_unbounded_growth(&self) -> bool {
        matches!(self, ExportError::UnboundedGrowth { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ExportError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ExportError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_source_unavailable_carries_limit() {
        let err = ExportError::source_unavailable(400, "connection reset");
        assert!(err.is_source_unavailable());
        let display = err.to_string();
        assert!(display.contains("400"));
        assert!(display.contains("connection reset"));
    }

    #[test]
    fn test_invalid_window_display() {
        let err = ExportError::InvalidWindow {
            start: DateKey::new(20240301),
            end: DateKey::new(20240101),
        };
        assert!(err.is_invalid_window());
        assert_eq!(
            err.to_string(),
            "Invalid window: start 2024-03-01 is after end 2024-01-01"
        );
    }

    #[test]
    fn test_unbounded_growth_display() {
        let err = ExportError::UnboundedGrowth {
            limit: 1600,
            rounds: 6,
        };
        assert!(err.is_unbounded_growth());
        assert!(err.to_string().contains("6 rounds"));
        assert!(err.to_string().contains("1600"));
    }

    #[test]
    fn test_parse_error_with_path() {
        let err = ExportError::Parse {
            format: "records JSON",
            message: "expected array".into(),
            path: Some(PathBuf::from("/path/to/dump.json")),
        };
        let display = err.to_string();
        assert!(display.contains("records JSON"));
        assert!(display.contains("/path/to/dump.json"));
    }

    #[test]
    fn test_parse_error_without_path() {
        let err = ExportError::parse("Twilio date", "bad input");
        assert!(!err.to_string().contains("file:"));
    }

    #[test]
    fn test_invalid_date() {
        let err = ExportError::invalid_date("01-01-2024");
        assert!(err.is_invalid_date());
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_source_error_chain() {
        use std::error::Error;

        let err = ExportError::source_unavailable(
            50,
            io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        );
        let source = err.source().expect("has source");
        assert_eq!(source.to_string(), "timed out");
    }
}
