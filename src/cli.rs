//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Source`] - Supported message sources
//! - [`OutputFormat`] - Output format options
//!
//! # Example
//!
//! ```rust
//! use smsexport::cli::{Args, Source};
//! use clap::Parser;
//!
//! let args = Args::parse_from([
//!     "smsexport", "file", "--input", "dump.json",
//!     "--start", "2024-01-01", "--end", "2024-01-31",
//! ]);
//! assert_eq!(args.source, Source::File);
//! assert_eq!(args.limit, 50);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use clap::{Parser, ValueEnum};

use crate::config::{DiscoveryConfig, TwilioConfig};
use crate::date::Window;
use crate::error::{ExportError, Result};
use crate::format::{self, export_path};

/// Export a date range of SMS history into CSV, JSON or JSONL.
///
/// The message source only lists its most recent messages, so the export
/// fetches progressively larger batches until the start date is covered.
#[derive(Parser, Debug, Clone)]
#[command(name = "smsexport")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    smsexport twilio --start 2024-01-01 --end 2024-01-31
    smsexport twilio --start 2024-03-01 --end 2024-03-07 -f jsonl -o exports
    smsexport file --input history.json --start 2024-01-01 --end 2024-06-30
    smsexport twilio --start 2024-05-01 --end 2024-05-31 --output-file may.jsonl")]
pub struct Args {
    /// Message source
    #[arg(value_enum)]
    pub source: Source,

    /// First day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: String,

    /// Records file for the `file` source (JSON array or JSON Lines)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Initial number of recent messages to fetch
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,

    /// Folder the timestamped export file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Write to this file instead of a timestamped one in --output-dir
    #[arg(long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output_file: Option<PathBuf>,

    /// Output format [default: csv, or the extension of --output-file]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Largest fetch size discovery may grow to
    #[arg(long, default_value_t = 1_000_000)]
    pub max_limit: usize,

    /// Maximum number of fetch rounds
    #[arg(long, default_value_t = 32)]
    pub max_rounds: usize,

    /// Give up on discovery after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Twilio account SID
    #[arg(long, env = "TWILIO_ACCOUNT_SID", hide_env_values = true)]
    pub account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Log discovery rounds and HTTP retries to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses `--start`/`--end` into a window.
    pub fn window(&self) -> Result<Window> {
        Window::parse(&self.start, &self.end)
    }

    /// Builds the discovery configuration from the fetch options.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig::new()
            .with_initial_limit(self.limit)
            .with_max_limit(self.max_limit)
            .with_max_rounds(self.max_rounds);
        if let Some(secs) = self.timeout {
            config = config.with_deadline(Duration::from_secs(secs));
        }
        config
    }

    /// Builds the Twilio configuration from flags or environment.
    pub fn twilio_config(&self) -> Result<TwilioConfig> {
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => Ok(TwilioConfig::new(sid, token)),
            _ => Err(ExportError::config(format!(
                "Twilio credentials missing: pass --account-sid/--auth-token or set {} and {}",
                TwilioConfig::ENV_ACCOUNT_SID,
                TwilioConfig::ENV_AUTH_TOKEN
            ))),
        }
    }

    /// Resolves where the export goes and in which format.
    ///
    /// With `--output-file` the path is used as given and, unless
    /// `--format` is set, its extension picks the format. Otherwise the
    /// file is `--output-dir` joined with the timestamped name for `now`.
    pub fn output_target<Tz>(&self, now: &DateTime<Tz>) -> Result<(PathBuf, format::OutputFormat)>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let explicit = self.format.map(format::OutputFormat::from);
        match &self.output_file {
            Some(path) => {
                let format = match explicit {
                    Some(format) => format,
                    None => format::OutputFormat::from_path(path)?,
                };
                Ok((path.clone(), format))
            }
            None => {
                let format = explicit.unwrap_or_default();
                Ok((export_path(&self.output_dir, now, format), format))
            }
        }
    }

    /// Directory that must exist before the export is written.
    pub fn output_parent(&self) -> &Path {
        match &self.output_file {
            Some(path) => path.parent().unwrap_or(Path::new("")),
            None => &self.output_dir,
        }
    }

    /// Path of the records file for the `file` source.
    pub fn input_path(&self) -> Result<&PathBuf> {
        self.input
            .as_ref()
            .ok_or_else(|| ExportError::config("the file source needs --input <PATH>"))
    }
}

/// Supported message sources.
///
/// - [`Twilio`](Source::Twilio) - Twilio Messages REST API
/// - [`File`](Source::File) - A local JSON or JSONL dump of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Source {
    /// Twilio Messages API
    Twilio,

    /// Local JSON / JSONL records file
    #[value(alias = "json")]
    File,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Twilio => write!(f, "Twilio"),
            Source::File => write!(f, "File"),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Six-column CSV table (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines - one record per line
    #[value(alias = "ndjson")]
    Jsonl,
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
