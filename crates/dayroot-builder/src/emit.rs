//! File emission helpers.
//!
//! Every emitted artifact is UTF-8 with LF line endings; top-level JSON files
//! are pretty-printed with a trailing newline. Files are written to
//! completion before anything hashes them.

use std::fs;
use std::path::Path;

use serde::Serialize;

use dayroot_core::DayrootResult;

pub(crate) fn write_text_file(path: &Path, content: &str) -> DayrootResult<()> {
    fs::write(path, content.as_bytes())?;
    Ok(())
}

pub(crate) fn write_json_file<T: Serialize>(path: &Path, value: &T) -> DayrootResult<()> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    write_text_file(path, &body)
}
