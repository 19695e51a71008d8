//! Field normalizers.
//!
//! Each normalizer is a deterministic, total function from a raw field value
//! to a normalized string. The registry is closed: exactly the names listed
//! in `Normalizer::parse` resolve, so an unrecognized name is a load-time
//! `UnknownNormalizer`, not a runtime surprise. Adding a name changes the
//! canonical form of existing profiles and requires a core-spec version bump.
//!
//! A registered `_optional` spelling maps empty or missing input to the
//! empty string and otherwise behaves exactly like its base rule. The
//! `_optional` spelling exists only where it is registered; it is not a
//! modifier that can be applied to arbitrary rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::canonical;
use crate::errors::{DayrootError, DayrootResult};

static HEX256_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-f]{64}$").unwrap());
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-f]{40}$").unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());

/// Base normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TrimAscii,
    Lower,
    Upper,
    IdnaLowerStripTrailingDot,
    LowerHex,
    LowerAddress,
    Iso8601ToUtc,
    DecimalString,
    LowerEnum,
    DeterministicJson,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::TrimAscii => "trim_ascii",
            Rule::Lower => "lower",
            Rule::Upper => "upper",
            Rule::IdnaLowerStripTrailingDot => "idna_lower_strip_trailing_dot",
            Rule::LowerHex => "lower_hex",
            Rule::LowerAddress => "lower_address",
            Rule::Iso8601ToUtc => "iso8601_to_utc",
            Rule::DecimalString => "decimal_string",
            Rule::LowerEnum => "lower_enum",
            Rule::DeterministicJson => "deterministic_json",
        }
    }
}

/// A named normalizer: a base rule plus the `_optional` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    pub rule: Rule,
    pub optional: bool,
}

impl Normalizer {
    /// Resolve a registered normalizer name.
    ///
    /// This is the entire registry; `lower_address` and `deterministic_json`
    /// are registered only in their `_optional` spellings.
    pub fn parse(name: &str) -> DayrootResult<Self> {
        let (rule, optional) = match name {
            "trim_ascii" => (Rule::TrimAscii, false),
            "trim_ascii_optional" => (Rule::TrimAscii, true),
            "lower" => (Rule::Lower, false),
            "upper" => (Rule::Upper, false),
            "idna_lower_strip_trailing_dot" => (Rule::IdnaLowerStripTrailingDot, false),
            "lower_hex" => (Rule::LowerHex, false),
            "lower_address_optional" => (Rule::LowerAddress, true),
            "iso8601_to_utc" => (Rule::Iso8601ToUtc, false),
            "decimal_string" => (Rule::DecimalString, false),
            "decimal_string_optional" => (Rule::DecimalString, true),
            "lower_enum" => (Rule::LowerEnum, false),
            "lower_enum_optional" => (Rule::LowerEnum, true),
            "deterministic_json_optional" => (Rule::DeterministicJson, true),
            _ => return Err(DayrootError::UnknownNormalizer(name.to_string())),
        };

        Ok(Self { rule, optional })
    }

    /// Apply to a raw field value; `None` means the field is absent.
    pub fn apply(&self, field: &str, value: Option<&Value>) -> DayrootResult<String> {
        let is_empty = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };

        if self.optional && is_empty {
            return Ok(String::new());
        }

        apply_rule(self.rule, field, value)
    }
}

fn apply_rule(rule: Rule, field: &str, value: Option<&Value>) -> DayrootResult<String> {
    if rule == Rule::DeterministicJson {
        let v = value.cloned().unwrap_or(Value::String(String::new()));
        return Ok(canonical::canonical_json_string(&v));
    }

    // Every remaining rule is textual: absent fields normalize from empty
    // input, structured values are rejected.
    let s = match value {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(DayrootError::invalid_format(
                field,
                other.to_string(),
                rule.name(),
            ))
        }
    };

    match rule {
        Rule::TrimAscii => Ok(s
            .trim_matches(|c: char| c.is_ascii_whitespace())
            .to_string()),
        Rule::Lower => Ok(s.to_lowercase()),
        Rule::Upper => Ok(s.to_uppercase()),
        Rule::IdnaLowerStripTrailingDot => Ok(idna_normalize(s)),
        Rule::LowerHex => {
            let lowered = s.to_lowercase();
            if !HEX256_RE.is_match(&lowered) {
                return Err(DayrootError::invalid_format(field, s, rule.name()));
            }
            Ok(lowered)
        }
        Rule::LowerAddress => {
            let lowered = s.to_lowercase();
            if !ADDRESS_RE.is_match(&lowered) {
                return Err(DayrootError::invalid_format(field, s, rule.name()));
            }
            Ok(lowered)
        }
        Rule::Iso8601ToUtc => iso8601_to_utc(field, s),
        Rule::DecimalString => {
            if !DECIMAL_RE.is_match(s) {
                return Err(DayrootError::invalid_format(field, s, rule.name()));
            }
            Ok(s.to_string())
        }
        Rule::LowerEnum => Ok(s.to_lowercase()),
        Rule::DeterministicJson => unreachable!("handled above"),
    }
}

/// IDNA-encode to A-label ASCII, lowercase, strip one trailing dot.
///
/// Values the IDNA mapping rejects pass through unencoded; domain validity is
/// a profile-schema concern, not a canonicalization concern.
fn idna_normalize(s: &str) -> String {
    let encoded = idna::domain_to_ascii(s).unwrap_or_else(|_| s.to_string());
    let lowered = encoded.to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Parse ISO-8601 (trailing `Z` or numeric offset accepted; an offset-free
/// timestamp is interpreted as UTC), convert to UTC, emit
/// `YYYY-MM-DDTHH:MM:SSZ`.
fn iso8601_to_utc(field: &str, s: &str) -> DayrootResult<String> {
    let parsed = OffsetDateTime::parse(s, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(s, &Iso8601::DEFAULT))
        .or_else(|_| PrimitiveDateTime::parse(s, &Iso8601::DEFAULT).map(|p| p.assume_utc()));

    let dt = match parsed {
        Ok(dt) => dt.to_offset(UtcOffset::UTC),
        Err(_) => {
            return Err(DayrootError::invalid_format(field, s, "iso8601_to_utc"));
        }
    };

    let fmt = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    dt.format(&fmt)
        .map_err(|_| DayrootError::invalid_format(field, s, "iso8601_to_utc"))
}
