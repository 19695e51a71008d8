//! Error surface for dayroot.
//!
//! Every failure mode the pipeline can report is a distinct variant so that
//! callers (and tests) can observe exactly which contract was broken. Input
//! validation and format errors carry the offending field; builder self-check
//! failures carry both digests. Nothing here is retried: a self-check or
//! append-only failure indicates a defect or a forbidden rewrite, not
//! recoverable data.

use thiserror::Error;

pub type DayrootResult<T> = Result<T, DayrootError>;

#[derive(Debug, Error)]
pub enum DayrootError {
    /// A record is missing a required field, or the field is empty.
    #[error("record {record_index}: missing required field '{field}'")]
    MissingRequiredField { record_index: usize, field: String },

    /// A profile references a normalizer that is not in the closed registry.
    #[error("unknown normalizer: {0}")]
    UnknownNormalizer(String),

    /// A normalizer rejected a field value.
    #[error("invalid value for field '{field}' under rule {rule}: {value:?}")]
    InvalidFormat {
        field: String,
        value: String,
        rule: String,
    },

    /// No records survived validation; a tree needs at least one leaf.
    #[error("cannot build a Merkle tree from an empty leaf set")]
    EmptyLeafSet,

    /// The builder self-check recomputed a different root than it wrote.
    #[error("Merkle root mismatch: computed {computed}, written {written}")]
    RootMismatch { computed: String, written: String },

    /// A sampled proof failed in-process verification.
    #[error("proof self-check failed for record {0}")]
    ProofSelfCheckFailed(usize),

    /// An already-published day would be rewritten with different content.
    #[error(
        "append-only violation for {date}: local digest {local_digest}, remote digest {remote_digest}"
    )]
    AppendOnlyViolation {
        date: String,
        local_digest: String,
        remote_digest: String,
    },

    /// The remote manifest could not be fetched (transport error or
    /// unexpected status). A clean 404 is not this error.
    #[error("remote unavailable at {url}: {cause}")]
    RemoteUnavailable { url: String, cause: String },

    /// The profile document is structurally invalid.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A record stream line is not a JSON object, or the stream is malformed.
    #[error("invalid record input: {0}")]
    InvalidRecord(String),

    /// The bundle date is not a YYYY-MM-DD calendar date.
    #[error("invalid bundle date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DayrootError {
    pub fn invalid_format(
        field: impl Into<String>,
        value: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            value: value.into(),
            rule: rule.into(),
        }
    }

    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        Self::InvalidProfile(msg.into())
    }
}
