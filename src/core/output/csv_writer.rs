//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Record;
use crate::error::Result;

/// Column names of the CSV export, in order.
pub const CSV_HEADER: [&str; 6] = ["From", "To", "Status", "Time", "Content", "Direction"];

/// Writes records to CSV.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `From`, `To`, `Status`, `Time`, `Content`, `Direction`
/// - Time: `YYYY-MM-DD HH:MM:SS` in UTC
/// - Encoding: UTF-8
///
/// The header is written even when `records` is empty.
pub fn write_csv(records: &[Record], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_to(records, file)
}

/// Converts records to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing
/// to a file.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let mut buffer = Vec::new();
    write_to(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_to<W: Write>(records: &[Record], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b',').from_writer(sink);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        let time = record.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        writer.write_record([
            record.from.as_str(),
            record.to.as_str(),
            record.status.as_str(),
            time.as_str(),
            record.body.as_str(),
            record.direction.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
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
            .with_status("delivered")
            .with_body("Hello")
            .with_direction("outbound-api")
    }

    #[test]
    fn test_write_csv_basic() {
        let temp_file = NamedTempFile::new().unwrap();
        write_csv(&[sample()], temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("From,To,Status,Time,Content,Direction"));
        assert_eq!(
            lines.next(),
            Some("+15550001111,+15550002222,delivered,2024-06-15 12:30:00,Hello,outbound-api")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let temp_file = NamedTempFile::new().unwrap();
        write_csv(&[], temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.trim_end(), "From,To,Status,Time,Content,Direction");
    }

    #[test]
    fn test_to_csv_quotes_commas_and_newlines() {
        let record = sample().with_body("Hi, there\nsecond line");
        let csv = to_csv(&[record]).unwrap();
        assert!(csv.contains("\"Hi, there\nsecond line\""));
    }
}
