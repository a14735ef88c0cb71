//! Message history loaded from a local JSON or JSONL dump.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Batch, MemorySource, PageFetcher};
use crate::Record;
use crate::error::{ExportError, Result};

/// A source backed by a file of records.
///
/// The file is either a JSON array of records or JSON Lines with one record
/// per line. Both shapes written by the JSON exporters are accepted, so a
/// previous export can be re-windowed offline.
///
/// # Example
///
/// ```no_run
/// use smsexport::source::{JsonFileSource, PageFetcher};
///
/// # fn main() -> smsexport::Result<()> {
/// let source = JsonFileSource::open("history.json")?;
/// println!("{} records from {}", source.len(), source.path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    inner: MemorySource,
}

impl JsonFileSource {
    /// Loads every record from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the file cannot be read and
    /// [`ExportError::Parse`] if it is not a record array or JSON Lines.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let records = parse_records(&content).map_err(|message| ExportError::Parse {
            format: "records JSON",
            message,
            path: Some(path.clone()),
        })?;
        debug!(path = %path.display(), records = records.len(), "loaded record dump");
        Ok(Self {
            path,
            inner: MemorySource::new(records),
        })
    }

    /// Path the records were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records loaded.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the file held no records.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PageFetcher for JsonFileSource {
    fn name(&self) -> &'static str {
        "JSON file"
    }

    fn list_recent(&mut self, limit: NonZeroUsize) -> Result<Batch> {
        self.inner.list_recent(limit)
    }
}

fn parse_records(content: &str) -> std::result::Result<Vec<Record>, String> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| e.to_string());
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| format!("line {}: {}", idx + 1, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_open_json_array() {
        let file = write_temp(
            r#"[
  {"created_at": "2024-01-01T10:00:00Z", "from": "+1", "body": "old"},
  {"created_at": "2024-01-03T10:00:00Z", "from": "+2", "body": "new"}
]"#,
        );
        let mut source = JsonFileSource::open(file.path()).unwrap();
        assert_eq!(source.len(), 2);

        let batch = source.list_recent(NonZeroUsize::new(1).unwrap()).unwrap();
        assert_eq!(batch[0].body, "new");
    }

    #[test]
    fn test_open_jsonl_export_shape() {
        let file = write_temp(
            "{\"from\":\"+1\",\"to\":\"+2\",\"status\":\"sent\",\"time\":\"2024-01-01T10:00:00Z\",\"content\":\"a\",\"direction\":\"inbound\"}\n\
             \n\
             {\"from\":\"+1\",\"to\":\"+2\",\"status\":\"sent\",\"time\":\"2024-01-02T10:00:00Z\",\"content\":\"b\",\"direction\":\"inbound\"}\n",
        );
        let source = JsonFileSource::open(file.path()).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.inner.records()[0].body, "b");
    }

    #[test]
    fn test_open_empty_file() {
        let file = write_temp("   \n");
        let source = JsonFileSource::open(file.path()).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_open_invalid_reports_path() {
        let file = write_temp("{not json}");
        let err = JsonFileSource::open(file.path()).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonFileSource::open("/nonexistent/history.json").unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
