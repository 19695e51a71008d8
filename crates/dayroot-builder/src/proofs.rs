//! Proof materialization.
//!
//! Re-reads the emitted records of a bundle, recomputes every leaf from
//! canonical bytes, verifies the recomputed root against the written
//! `daily_root.txt`, and writes `proofs/<i>.json` per record plus
//! `proofs/proof_index.json`. Working from the re-read files (instead of the
//! in-memory batch) catches filesystem or serialization divergence before
//! any proof is published.
//!
//! A deterministic sample of the written proofs is re-verified in-process;
//! the sample indices are fixed by the record count, not drawn at random.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use dayroot_core::merkle::{compute_leaf, verify_proof, MerkleTree};
use dayroot_core::model::{ProofIndex, ProofIndexEntry, ARTIFACT_VERSION};
use dayroot_core::profile::Profile;
use dayroot_core::record::{self, Record};
use dayroot_core::{DayrootError, DayrootResult};

use crate::emit;
use crate::input;

/// Read the sorted records back from a bundle's `records-*.jsonl` files.
pub fn read_sorted_records(bundle_dir: &Path) -> DayrootResult<Vec<Record>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(bundle_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("records-") && name.ends_with(".jsonl") {
            names.push(name);
        }
    }
    names.sort();

    if names.is_empty() {
        return Err(DayrootError::InvalidRecord(format!(
            "no records-*.jsonl files in {}",
            bundle_dir.display()
        )));
    }

    let mut records = Vec::new();
    for name in &names {
        let text = fs::read_to_string(bundle_dir.join(name))?;
        records.extend(input::parse_records(&text)?);
    }
    Ok(records)
}

/// Recompute the Merkle tree of a bundle from its emitted records.
pub fn recompute_tree(bundle_dir: &Path, profile: &Profile) -> DayrootResult<MerkleTree> {
    let records = read_sorted_records(bundle_dir)?;
    let mut leaves = Vec::with_capacity(records.len());
    for r in &records {
        leaves.push(compute_leaf(&record::canonical_bytes(r, profile)?));
    }
    MerkleTree::from_leaves(leaves)
}

/// The root a bundle claims, from `daily_root.txt`.
pub fn read_daily_root(bundle_dir: &Path) -> DayrootResult<String> {
    let text = fs::read_to_string(bundle_dir.join("daily_root.txt"))?;
    Ok(text.trim_end().to_string())
}

/// Regenerate all proofs for an existing bundle directory.
///
/// Fails `RootMismatch` if the recomputed root disagrees with the written
/// `daily_root.txt`, and `ProofSelfCheckFailed` if the sampled verification
/// disagrees.
pub fn generate_proofs_for_bundle(
    bundle_dir: &Path,
    profile: &Profile,
) -> DayrootResult<ProofIndex> {
    let tree = recompute_tree(bundle_dir, profile)?;
    let written = read_daily_root(bundle_dir)?;

    if tree.root() != written {
        return Err(DayrootError::RootMismatch {
            computed: tree.root().to_string(),
            written,
        });
    }

    materialize(bundle_dir, &tree)
}

/// Write `proofs/<i>.json` for every leaf plus `proofs/proof_index.json`,
/// then re-verify a sample.
pub fn materialize(bundle_dir: &Path, tree: &MerkleTree) -> DayrootResult<ProofIndex> {
    let proofs_dir = bundle_dir.join("proofs");
    fs::create_dir_all(&proofs_dir)?;

    let total = tree.leaf_count();
    info!(total, "materializing proofs");

    let mut entries = Vec::with_capacity(total);
    for i in 0..total {
        let proof = tree.prove(i)?;
        emit::write_json_file(&proofs_dir.join(format!("{i}.json")), &proof)?;
        entries.push(ProofIndexEntry {
            record_index: i,
            proof_file: format!("proofs/{i}.json"),
            leaf_hash: proof.leaf_hash,
        });
    }

    let index = ProofIndex {
        version: ARTIFACT_VERSION.to_string(),
        total_records: total,
        merkle_root: tree.root().to_string(),
        proofs: entries,
    };
    emit::write_json_file(&proofs_dir.join("proof_index.json"), &index)?;

    self_check(tree)?;
    debug!(total, "proofs written and sample-verified");

    Ok(index)
}

fn self_check(tree: &MerkleTree) -> DayrootResult<()> {
    for i in sample_indices(tree.leaf_count()) {
        let proof = tree.prove(i)?;
        if !verify_proof(&proof.leaf_hash, &proof.proof, &proof.expected_root) {
            return Err(DayrootError::ProofSelfCheckFailed(i));
        }
    }
    Ok(())
}

/// Deterministic sample: every index when the bundle is small, otherwise the
/// two ends plus evenly spaced interior points.
fn sample_indices(n: usize) -> Vec<usize> {
    if n <= 5 {
        return (0..n).collect();
    }
    let picks = [0, n / 4, n / 2, 3 * n / 4, n - 1];
    picks.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}
