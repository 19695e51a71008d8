//! Record canonicalization.
//!
//! A record enters as a JSON object; its canonical bytes are the normalized
//! values of the profile's canonical fields joined by the profile separator
//! and terminated by the profile line ending. The bytes depend only on the
//! field values and the profile: input key order, whitespace around values,
//! and absent optional fields do not affect the output.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;

use crate::canonical;
use crate::errors::{DayrootError, DayrootResult};
use crate::merkle;
use crate::profile::{Profile, SORT_KEY_CANONICAL_BYTES};

/// A raw input record. `BTreeMap` keeps iteration and re-serialization
/// independent of the key order in the input stream.
pub type Record = BTreeMap<String, Value>;

/// A record together with its derived canonical forms.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub record: Record,
    pub normalized: BTreeMap<String, String>,
    pub canonical: String,
    pub leaf_hash: String,
    sort_key: Vec<String>,
}

/// Check that every record carries every required field with a non-empty
/// value. Reported with the offending record index and field.
pub fn validate_required(records: &[Record], profile: &Profile) -> DayrootResult<()> {
    for (index, record) in records.iter().enumerate() {
        for field in &profile.required_fields {
            let present = match record.get(field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(DayrootError::MissingRequiredField {
                    record_index: index,
                    field: field.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Normalize every canonical field of a record.
pub fn normalize_record(
    record: &Record,
    profile: &Profile,
) -> DayrootResult<BTreeMap<String, String>> {
    let mut normalized = BTreeMap::new();
    for field in &profile.canonical_fields {
        let normalizer = profile.normalizer_for(field)?;
        let value = normalizer.apply(field, record.get(field))?;
        normalized.insert(field.clone(), value);
    }
    Ok(normalized)
}

/// Canonical byte string of a record under a profile.
pub fn canonical_bytes(record: &Record, profile: &Profile) -> DayrootResult<String> {
    let normalized = normalize_record(record, profile)?;
    Ok(assemble_canonical(&normalized, profile))
}

fn assemble_canonical(normalized: &BTreeMap<String, String>, profile: &Profile) -> String {
    let joined: Vec<&str> = profile
        .canonical_fields
        .iter()
        .map(|f| normalized.get(f).map(String::as_str).unwrap_or(""))
        .collect();
    let mut out = joined.join(&profile.canonical_record_separator);
    out.push_str(&profile.canonical_line_ending);
    out
}

impl PreparedRecord {
    /// Derive the canonical forms of one record.
    pub fn prepare(record: Record, profile: &Profile) -> DayrootResult<Self> {
        let normalized = normalize_record(&record, profile)?;
        let canonical = assemble_canonical(&normalized, profile);
        let leaf_hash = merkle::compute_leaf(&canonical);

        let sort_key = profile
            .sort_keys
            .iter()
            .map(|key| {
                if key == SORT_KEY_CANONICAL_BYTES {
                    canonical.clone()
                } else {
                    normalized.get(key).cloned().unwrap_or_default()
                }
            })
            .collect();

        Ok(Self {
            record,
            normalized,
            canonical,
            leaf_hash,
            sort_key,
        })
    }

    /// Canonical-JSON line for the emitted records file.
    pub fn to_jsonl_line(&self) -> String {
        canonical::canonical_json_string(&Value::Object(
            self.record
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ))
    }
}

/// Prepare and sort a batch: lexicographic on the sort-key tuple, with the
/// canonical bytes and the serialized record as final tiebreaks so that the
/// result never depends on input order.
pub fn prepare_and_sort(
    records: Vec<Record>,
    profile: &Profile,
) -> DayrootResult<Vec<PreparedRecord>> {
    validate_required(&records, profile)?;

    let mut prepared = Vec::with_capacity(records.len());
    for record in records {
        prepared.push(PreparedRecord::prepare(record, profile)?);
    }

    prepared.sort_by(|a, b| {
        a.sort_key
            .cmp(&b.sort_key)
            .then_with(|| a.canonical.cmp(&b.canonical))
            .then_with(|| compare_serialized(a, b))
    });

    Ok(prepared)
}

fn compare_serialized(a: &PreparedRecord, b: &PreparedRecord) -> Ordering {
    a.to_jsonl_line().cmp(&b.to_jsonl_line())
}
