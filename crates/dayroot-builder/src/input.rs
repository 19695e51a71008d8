//! Record stream loading.
//!
//! The input format is JSONL: one JSON object per line, LF-terminated, UTF-8
//! with no BOM. Blank lines are ignored. Field values are strings unless a
//! normalizer accepts structured input.

use std::fs;
use std::path::Path;

use dayroot_core::record::Record;
use dayroot_core::{DayrootError, DayrootResult};

/// Load records from a JSONL file.
pub fn load_records(path: &Path) -> DayrootResult<Vec<Record>> {
    let text = fs::read_to_string(path).map_err(|e| {
        DayrootError::InvalidRecord(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_records(&text)
}

/// Parse a JSONL record stream from memory.
pub fn parse_records(text: &str) -> DayrootResult<Vec<Record>> {
    if text.starts_with('\u{feff}') {
        return Err(DayrootError::InvalidRecord(
            "record stream must not start with a BOM".to_string(),
        ));
    }

    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line).map_err(|e| {
            DayrootError::InvalidRecord(format!("line {}: {e}", lineno + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}
