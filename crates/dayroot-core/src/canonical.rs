//! Canonical JSON encoding.
//!
//! The deterministic byte form used for structured-field normalization and
//! for every digest computed over a JSON document:
//! - object keys sorted by Unicode code point
//! - no insignificant whitespace
//! - compact number form
//! - only required characters escaped (quote, backslash, control characters)
//! - UTF-8 output, non-ASCII characters unescaped
//!
//! The encoder is written out here rather than delegated to a library's
//! default formatting: default serde output makes no ordering promise once a
//! `preserve_order` feature enters the dependency graph, and canonical bytes
//! must not depend on feature unification.

use serde::Serialize;
use serde_json::Value;

use crate::errors::DayrootResult;

/// Canonical JSON encoding of a `serde_json::Value` as a string.
pub fn canonical_json_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Canonical JSON encoding as UTF-8 bytes.
pub fn canonical_json_bytes(value: &Value) -> Vec<u8> {
    canonical_json_string(value).into_bytes()
}

/// Canonical JSON encoding of any serializable value.
pub fn canonical_json_of<T: Serialize>(value: &T) -> DayrootResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    Ok(canonical_json_bytes(&v))
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        // serde_json's Display for Number is already the compact form.
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Sort explicitly instead of trusting map iteration order.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
