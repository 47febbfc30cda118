use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use logsift_types::LogRecord;

use crate::StoreError;

/// Parse one JSONL line into a log record
pub fn parse_record(line: &str) -> Result<LogRecord, StoreError> {
    Ok(serde_json::from_str(line)?)
}

/// Load records from a JSONL file, one JSON object per line
///
/// Blank lines and lines that fail to parse are skipped with a warning;
/// record order follows file order. I/O failures abort the load.
pub fn load_records(path: &Path) -> Result<Vec<LogRecord>, StoreError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(line = number + 1, %err, "skipping malformed log record"),
        }
    }

    Ok(records)
}
