use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct ProofsOut {
    pub bundle_dir: String,
    pub total_records: usize,
    pub merkle_root: String,
}

pub fn run(bundle_dir: &Path, profile_dir: &Path, profile_id: &str) -> Result<()> {
    let profile = dayroot_builder::load_profile(profile_dir, profile_id)?;
    let index = dayroot_builder::generate_proofs_for_bundle(bundle_dir, &profile)?;

    let out = ProofsOut {
        bundle_dir: bundle_dir.display().to_string(),
        total_records: index.total_records,
        merkle_root: index.merkle_root,
    };
    output::print(&out)?;
    output::line(&format!(
        "generated {} proofs under {}",
        out.total_records, out.bundle_dir
    ));
    output::line(&format!("  merkle root: {}", out.merkle_root));
    Ok(())
}
