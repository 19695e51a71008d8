//! Bundle artifact models.
//!
//! Strongly-typed representations of everything a bundle directory contains.
//! These are deliberately "dumb" data: policy, validation, and I/O live in
//! higher layers. Canonical digests of these documents are produced by
//! `crate::canonical`, never by default serde formatting.

use serde::{Deserialize, Serialize};

/// Version string shared by manifest, checkpoint, and proof index documents.
pub const ARTIFACT_VERSION: &str = "1";

/// `prev_checkpoint_sha256` of a chain's first checkpoint.
pub const GENESIS_PREV_CHECKPOINT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// The fixed constants published as `core_spec.json` in every bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSpec {
    pub core_spec_version: String,
    pub hash: String,
    pub merkle: String,
    pub odd_leaf: String,
    pub hex: String,
    pub encoding: String,
    pub canonical_line_ending: String,
    pub canonical_record_separator: String,
}

impl CoreSpec {
    /// The constants this implementation conforms to.
    pub fn current() -> Self {
        Self {
            core_spec_version: crate::core_spec::VERSION.to_string(),
            hash: crate::core_spec::HASH.to_string(),
            merkle: crate::core_spec::MERKLE.to_string(),
            odd_leaf: crate::core_spec::ODD_LEAF.to_string(),
            hex: crate::core_spec::HEX.to_string(),
            encoding: crate::core_spec::ENCODING.to_string(),
            canonical_line_ending: crate::core_spec::CANONICAL_LINE_ENDING.to_string(),
            canonical_record_separator: crate::core_spec::CANONICAL_RECORD_SEPARATOR.to_string(),
        }
    }
}

/// The `profile.json` stamp emitted into a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStamp {
    pub profile_id: String,
    pub profile_version: String,
    pub profile_sha256: String,
}

/// One entry of `manifest.json.files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

/// `manifest.json`: per-file digests plus the bundle-level digests.
///
/// `daily_root_sha256` is the Merkle root hex; the `_sha256` suffix is
/// historical, it is not a digest of another digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub date: String,
    pub files: Vec<ManifestFile>,
    pub core_spec_sha256: String,
    pub profile_sha256: String,
    pub daily_root_sha256: String,
}

/// `checkpoint.json`: chains bundle days in publication order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: String,
    pub date: String,
    pub manifest_sha256: String,
    pub daily_root: String,
    pub prev_checkpoint_sha256: String,
}

/// Which child the current node is at a proof step; the sibling sits on the
/// other side of the concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// One step of an inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub direction: Direction,
    pub sibling_hash: String,
}

/// `proofs/<i>.json`: an inclusion proof for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordProof {
    pub leaf_index: usize,
    pub leaf_hash: String,
    pub proof: Vec<ProofStep>,
    pub expected_root: String,
}

/// One entry of `proofs/proof_index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofIndexEntry {
    pub record_index: usize,
    pub proof_file: String,
    pub leaf_hash: String,
}

/// `proofs/proof_index.json`: every proof of the bundle, in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofIndex {
    pub version: String,
    pub total_records: usize,
    pub merkle_root: String,
    pub proofs: Vec<ProofIndexEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_spec_constants() {
        let spec = CoreSpec::current();
        assert_eq!(spec.core_spec_version, "1.2.1");
        assert_eq!(spec.hash, "sha256");
        assert_eq!(spec.merkle, "binary");
        assert_eq!(spec.odd_leaf, "duplicate_last");
        assert_eq!(spec.hex, "lowercase");
        assert_eq!(spec.encoding, "utf-8");
        assert_eq!(spec.canonical_line_ending, "\n");
        assert_eq!(spec.canonical_record_separator, "|");
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"left\"");
        assert_eq!(
            serde_json::to_string(&Direction::Right).unwrap(),
            "\"right\""
        );
    }

    #[test]
    fn proof_json_shape() {
        let p = RecordProof {
            leaf_index: 0,
            leaf_hash: "aa".repeat(32),
            proof: vec![ProofStep {
                direction: Direction::Left,
                sibling_hash: "bb".repeat(32),
            }],
            expected_root: "cc".repeat(32),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["proof"][0]["direction"], "left");
        assert!(v["leaf_index"].is_u64());
        assert!(v["expected_root"].is_string());
    }

    #[test]
    fn genesis_sentinel_is_64_zeros() {
        assert_eq!(GENESIS_PREV_CHECKPOINT.len(), 64);
        assert!(GENESIS_PREV_CHECKPOINT.bytes().all(|b| b == b'0'));
    }
}
