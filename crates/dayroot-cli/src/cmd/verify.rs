use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use dayroot_core::hash::is_hex_digest;
use dayroot_core::merkle::verify_proof;
use dayroot_core::model::RecordProof;

use crate::output;

#[derive(Debug, Serialize)]
pub struct VerifyOut {
    pub leaf_hash: String,
    pub expected_root: String,
    pub valid: bool,
}

pub fn run(proof_path: &Path, root: Option<String>, leaf: Option<String>) -> Result<()> {
    let proof: RecordProof = serde_json::from_str(&fs::read_to_string(proof_path)?)?;

    let leaf_hash = leaf.unwrap_or_else(|| proof.leaf_hash.clone());
    let expected_root = root.unwrap_or_else(|| proof.expected_root.clone());
    if !is_hex_digest(&leaf_hash) {
        bail!("leaf hash is not 64 lowercase hex characters: {leaf_hash}");
    }
    if !is_hex_digest(&expected_root) {
        bail!("root is not 64 lowercase hex characters: {expected_root}");
    }

    let valid = verify_proof(&leaf_hash, &proof.proof, &expected_root);
    output::print(&VerifyOut {
        leaf_hash: leaf_hash.clone(),
        expected_root: expected_root.clone(),
        valid,
    })?;

    if !valid {
        bail!("proof verification failed for leaf {leaf_hash}");
    }
    output::line(&format!("proof valid: leaf {leaf_hash} is committed under {expected_root}"));
    Ok(())
}
