//! JSON Lines (JSONL) output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::JsonRecord;
use crate::Record;
use crate::error::Result;

/// Writes records to JSONL (JSON Lines) format.
///
/// Each line is a complete JSON object:
/// ```jsonl
/// {"from":"+1555...","to":"+1555...","status":"sent","time":"2024-06-15T12:30:00Z","content":"Hi","direction":"outbound-api"}
/// ```
pub fn write_jsonl(records: &[Record], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_lines(records, BufWriter::new(file))
}

/// Converts records to a JSONL string.
pub fn to_jsonl(records: &[Record]) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<W: Write>(records: &[Record], mut writer: W) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(&JsonRecord::from(record))?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}
