//! Binary Merkle commitments.
//!
//! Construction is an iterative layer loop: each layer is derived from the
//! one below by duplicating the last element when the count is odd and
//! hashing adjacent pairs as `sha256(left_hex ++ right_hex)` over the hex
//! string forms (see `crate::hash`). The stored layers include the
//! duplicates, so every non-root node has a sibling and proof generation
//! never walks off a layer.
//!
//! A single leaf is its own root with no hashing applied.

use crate::errors::{DayrootError, DayrootResult};
use crate::hash::parent_hex;
use crate::hash::sha256_hex;
use crate::model::{Direction, ProofStep, RecordProof};

/// Leaf hash of a record's canonical byte string.
pub fn compute_leaf(canonical: &str) -> String {
    sha256_hex(canonical.as_bytes())
}

/// A built tree: all layers, leaves first, root layer last.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<String>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over an ordered leaf sequence.
    pub fn from_leaves(leaves: Vec<String>) -> DayrootResult<Self> {
        if leaves.is_empty() {
            return Err(DayrootError::EmptyLeafSet);
        }

        let leaf_count = leaves.len();
        let mut layers = vec![leaves];

        while layers.last().expect("layers is non-empty").len() > 1 {
            // Pad in place so proofs can read the duplicate sibling.
            let current = layers.last_mut().expect("layers is non-empty");
            if current.len() % 2 == 1 {
                let last = current.last().expect("layer is non-empty").clone();
                current.push(last);
            }

            let next: Vec<String> = layers
                .last()
                .expect("layers is non-empty")
                .chunks(2)
                .map(|pair| parent_hex(&pair[0], &pair[1]))
                .collect();
            layers.push(next);
        }

        Ok(Self { layers, leaf_count })
    }

    /// The daily root.
    pub fn root(&self) -> &str {
        &self.layers.last().expect("layers is non-empty")[0]
    }

    /// Number of leaves committed (excluding odd-count duplicates).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The committed leaves, in order (excluding odd-count duplicates).
    pub fn leaves(&self) -> &[String] {
        &self.layers[0][..self.leaf_count]
    }

    /// Inclusion proof for the leaf at `leaf_index`.
    pub fn prove(&self, leaf_index: usize) -> DayrootResult<RecordProof> {
        if leaf_index >= self.leaf_count {
            return Err(DayrootError::InvalidRecord(format!(
                "leaf index {leaf_index} out of range [0, {})",
                self.leaf_count
            )));
        }

        let leaf_hash = self.layers[0][leaf_index].clone();
        let mut proof = Vec::with_capacity(self.layers.len().saturating_sub(1));
        let mut index = leaf_index;

        for layer in &self.layers[..self.layers.len() - 1] {
            let is_left = index % 2 == 0;
            let sibling_index = if is_left { index + 1 } else { index - 1 };

            proof.push(ProofStep {
                direction: if is_left {
                    Direction::Left
                } else {
                    Direction::Right
                },
                sibling_hash: layer[sibling_index].clone(),
            });

            index /= 2;
        }

        Ok(RecordProof {
            leaf_index,
            leaf_hash,
            proof,
            expected_root: self.root().to_string(),
        })
    }
}

/// Fold a proof from a leaf hash up to a root and compare.
pub fn verify_proof(leaf_hash: &str, proof: &[ProofStep], expected_root: &str) -> bool {
    let mut current = leaf_hash.to_string();

    for step in proof {
        current = match step.direction {
            Direction::Left => parent_hex(&current, &step.sibling_hash),
            Direction::Right => parent_hex(&step.sibling_hash, &current),
        };
    }

    current == expected_root
}
