//! Bundle building.
//!
//! `build_bundle` is the orchestration spine: validate the batch, sort it
//! into canonical order, commit it to a Merkle tree, run the append-only
//! guard, and only then touch the filesystem. Validation and format errors
//! abort before any file is written, so a failed build leaves no partial
//! bundle behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::macros::format_description;
use tracing::{debug, info};

use dayroot_core::merkle::MerkleTree;
use dayroot_core::model::{
    Checkpoint, CoreSpec, ProfileStamp, ARTIFACT_VERSION, GENESIS_PREV_CHECKPOINT,
};
use dayroot_core::profile::Profile;
use dayroot_core::record::{self, Record};
use dayroot_core::{DayrootError, DayrootResult};

use crate::{emit, guard, manifest, proofs};

/// Maximum records per emitted `records-NNN.jsonl` chunk.
pub const RECORDS_PER_FILE: usize = 10_000;

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Base URL of the published bundles; enables the remote half of the
    /// append-only guard.
    pub remote_url: Option<String>,
    /// Path to the previous day's `checkpoint.json`. Absent means this is
    /// the first checkpoint of the chain.
    pub prev_checkpoint: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub date: String,
    pub records_count: usize,
    pub record_files: usize,
    pub daily_root: String,
    pub bundle_dir: PathBuf,
}

/// Build a complete bundle directory under `<output_dir>/proofs/<date>/`.
pub async fn build_bundle(
    records: Vec<Record>,
    profile: &Profile,
    date: &str,
    output_dir: &Path,
    options: &BuildOptions,
) -> DayrootResult<BuildReport> {
    validate_date(date)?;

    // Everything the bundle commits to is computed in memory first; the
    // filesystem is untouched until the guard has passed.
    let prepared = record::prepare_and_sort(records, profile)?;
    let leaves: Vec<String> = prepared.iter().map(|r| r.leaf_hash.clone()).collect();
    let tree = MerkleTree::from_leaves(leaves)?;
    let root = tree.root().to_string();

    let bundle_dir = output_dir.join("proofs").join(date);
    guard::preflight(&bundle_dir, date, &root, options.remote_url.as_deref()).await?;

    info!(date, records = prepared.len(), root = %root, "building bundle");
    fs::create_dir_all(&bundle_dir)?;

    let mut file_names = Vec::new();
    for (chunk_no, chunk) in prepared.chunks(RECORDS_PER_FILE).enumerate() {
        let name = format!("records-{chunk_no:03}.jsonl");
        let mut body = String::new();
        for r in chunk {
            body.push_str(&r.to_jsonl_line());
            body.push('\n');
        }
        emit::write_text_file(&bundle_dir.join(&name), &body)?;
        file_names.push(name);
    }
    debug!(files = file_names.len(), "records emitted");

    emit::write_text_file(&bundle_dir.join("daily_root.txt"), &format!("{root}\n"))?;
    emit::write_json_file(&bundle_dir.join("core_spec.json"), &CoreSpec::current())?;

    let stamp = ProfileStamp {
        profile_id: profile.profile_id.clone(),
        profile_version: profile.profile_version.clone(),
        profile_sha256: profile.canonical_digest()?,
    };
    emit::write_json_file(&bundle_dir.join("profile.json"), &stamp)?;

    for name in ["daily_root.txt", "core_spec.json", "profile.json"] {
        file_names.push(name.to_string());
    }
    let bundle_manifest = manifest::generate(date, &bundle_dir, &file_names, &root)?;
    emit::write_json_file(&bundle_dir.join("manifest.json"), &bundle_manifest)?;

    let checkpoint = Checkpoint {
        version: ARTIFACT_VERSION.to_string(),
        date: date.to_string(),
        manifest_sha256: manifest::file_sha256_hex(&bundle_dir.join("manifest.json"))?,
        daily_root: root.clone(),
        prev_checkpoint_sha256: match &options.prev_checkpoint {
            Some(path) => manifest::file_sha256_hex(path)?,
            None => GENESIS_PREV_CHECKPOINT.to_string(),
        },
    };
    emit::write_json_file(&bundle_dir.join("checkpoint.json"), &checkpoint)?;

    // Self-check against the bytes on disk, then materialize proofs from the
    // re-read tree.
    let index = proofs::generate_proofs_for_bundle(&bundle_dir, profile)?;
    debug!(proofs = index.total_records, "bundle complete");

    Ok(BuildReport {
        date: date.to_string(),
        records_count: prepared.len(),
        record_files: prepared.chunks(RECORDS_PER_FILE).len(),
        daily_root: root,
        bundle_dir,
    })
}

fn validate_date(date: &str) -> DayrootResult<()> {
    let fmt = format_description!("[year]-[month]-[day]");
    time::Date::parse(date, &fmt)
        .map_err(|_| DayrootError::InvalidDate(date.to_string()))?;
    Ok(())
}
