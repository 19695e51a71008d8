//! dayroot-core
//!
//! Core primitives for dayroot:
//! - SHA-256 hashing with lowercase-hex discipline
//! - Canonical JSON encoding for deterministic digests
//! - The closed field-normalizer registry
//! - Record canonicalization against a profile
//! - Binary Merkle commitments with inclusion proofs
//! - Bundle artifact models (core spec, manifest, checkpoint, proofs)
//!
//! This crate performs no filesystem or network I/O. Higher-level crates load
//! records and profiles and pass bytes/structures in.

pub mod canonical;
pub mod errors;
pub mod hash;
pub mod merkle;
pub mod model;
pub mod normalize;
pub mod profile;
pub mod record;

pub use crate::errors::{DayrootError, DayrootResult};

/// The fixed constants governing hashing, encoding, and tree shape.
///
/// Published in every bundle as `core_spec.json`. These must remain stable;
/// changing any value is a breaking change to every published root.
pub mod core_spec {
    pub const VERSION: &str = "1.2.1";
    pub const HASH: &str = "sha256";
    pub const MERKLE: &str = "binary";
    pub const ODD_LEAF: &str = "duplicate_last";
    pub const HEX: &str = "lowercase";
    pub const ENCODING: &str = "utf-8";
    pub const CANONICAL_LINE_ENDING: &str = "\n";
    pub const CANONICAL_RECORD_SEPARATOR: &str = "|";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::canonical::{canonical_json_bytes, canonical_json_of, canonical_json_string};
    pub use crate::hash::{parent_hex, sha256_hex};
    pub use crate::merkle::{compute_leaf, verify_proof, MerkleTree};
    pub use crate::model::{
        Checkpoint, CoreSpec, Direction, Manifest, ManifestFile, ProfileStamp, ProofIndex,
        ProofIndexEntry, ProofStep, RecordProof,
    };
    pub use crate::normalize::{Normalizer, Rule};
    pub use crate::profile::Profile;
    pub use crate::record::{PreparedRecord, Record};
    pub use crate::{DayrootError, DayrootResult};
}
