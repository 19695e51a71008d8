//! Record profiles.
//!
//! A profile is the schema a batch of records is canonicalized under: which
//! fields are required, which fields (in which order) make up the canonical
//! bytes, which normalizer applies to each field, and how records are sorted.
//! Profiles are validated strictly at load; every referenced normalizer must
//! resolve against the closed registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::errors::{DayrootError, DayrootResult};
use crate::hash;
use crate::normalize::Normalizer;

/// Sort-key token that resolves to a record's canonical byte string instead
/// of a normalized field value.
pub const SORT_KEY_CANONICAL_BYTES: &str = "canonical_bytes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,
    pub profile_version: String,
    pub required_fields: Vec<String>,
    pub canonical_fields: Vec<String>,
    pub normalizers: BTreeMap<String, String>,
    pub sort_keys: Vec<String>,
    #[serde(default = "default_separator")]
    pub canonical_record_separator: String,
    #[serde(default = "default_line_ending")]
    pub canonical_line_ending: String,
}

fn default_separator() -> String {
    crate::core_spec::CANONICAL_RECORD_SEPARATOR.to_string()
}

fn default_line_ending() -> String {
    crate::core_spec::CANONICAL_LINE_ENDING.to_string()
}

impl Profile {
    /// Parse and validate a profile document.
    pub fn from_json_bytes(bytes: &[u8]) -> DayrootResult<Self> {
        let profile: Profile = serde_json::from_slice(bytes)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Structural validation. Normalizer names resolve here so that a typo in
    /// a profile fails at load, not mid-build.
    pub fn validate(&self) -> DayrootResult<()> {
        if self.profile_id.trim().is_empty() {
            return Err(DayrootError::invalid_profile("profile_id is empty"));
        }
        if self.canonical_fields.is_empty() {
            return Err(DayrootError::invalid_profile("canonical_fields is empty"));
        }
        if self.canonical_record_separator.is_empty() {
            return Err(DayrootError::invalid_profile(
                "canonical_record_separator is empty",
            ));
        }

        for name in self.normalizers.values() {
            Normalizer::parse(name)?;
        }

        // Every canonical field must declare its normalization; an undeclared
        // field would silently canonicalize differently across profiles.
        for field in &self.canonical_fields {
            if !self.normalizers.contains_key(field) {
                return Err(DayrootError::invalid_profile(format!(
                    "canonical field '{field}' has no normalizer"
                )));
            }
        }

        Ok(())
    }

    /// The resolved normalizer for a canonical field.
    ///
    /// Only valid after `validate`; the name is guaranteed to resolve.
    pub fn normalizer_for(&self, field: &str) -> DayrootResult<Normalizer> {
        let name = self.normalizers.get(field).ok_or_else(|| {
            DayrootError::invalid_profile(format!("canonical field '{field}' has no normalizer"))
        })?;
        Normalizer::parse(name)
    }

    /// Canonical digest of the profile document: SHA-256 over the
    /// canonical-JSON encoding of the parsed profile. Independent of on-disk
    /// whitespace and key order.
    pub fn canonical_digest(&self) -> DayrootResult<String> {
        let bytes = canonical::canonical_json_of(self)?;
        Ok(hash::sha256_hex(&bytes))
    }
}
