use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print a result value: pretty JSON in `--json` mode, nothing otherwise.
/// Commands print their own human-readable lines via `line`.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    if is_json() {
        let s = serde_json::to_string_pretty(value)?;
        println!("{s}");
    }
    Ok(())
}

pub fn line(msg: &str) {
    if !is_json() {
        println!("{msg}");
    }
}
