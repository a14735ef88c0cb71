//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::JsonRecord;
use crate::Record;
use crate::error::Result;

/// Writes records to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"from": "+1555...", "to": "+1555...", "status": "delivered",
///    "time": "2024-06-15T12:30:00Z", "content": "Hello", "direction": "inbound"}
/// ]
/// ```
pub fn write_json(records: &[Record], output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(records)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts records to a pretty-printed JSON array.
///
/// Same format as [`write_json`], but returns a String instead of writing
/// to a file.
pub fn to_json(records: &[Record]) -> Result<String> {
    let rows: Vec<JsonRecord<'_>> = records.iter().map(JsonRecord::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    fn sample() -> Record {
        Record::new(Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap())
            .with_from("+15550001111")
            .with_to("+15550002222")
            .with_status("received")
            .with_body("Hello")
            .with_direction("inbound")
    }

    #[test]
    fn test_to_json_basic() {
        let json = to_json(&[sample()]).unwrap();

        assert!(json.contains(r#""from": "+15550001111""#));
        assert!(json.contains(r#""content": "Hello""#));
        assert!(json.contains(r#""time": "2024-06-15T12:30:00Z""#));
        assert!(!json.contains("sid"));
    }

    #[test]
    fn test_to_json_includes_sid() {
        let json = to_json(&[sample().with_sid("SM123")]).unwrap();
        assert!(json.contains(r#""sid": "SM123""#));
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_json_reads_back() {
        let temp_file = NamedTempFile::new().unwrap();
        write_json(&[sample()], temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, vec![sample()]);
    }
}
