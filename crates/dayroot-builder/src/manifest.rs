//! Manifest generation.
//!
//! The manifest binds the commitment files of a bundle: for each file its
//! path, SHA-256 over the bytes as written, and size, sorted by path.
//! `daily_root_sha256` carries the Merkle root hex; `core_spec_sha256` and
//! `profile_sha256` are digests of the corresponding emitted files.

use std::fs;
use std::path::Path;

use dayroot_core::hash::sha256_hex;
use dayroot_core::model::{Manifest, ManifestFile, ARTIFACT_VERSION};
use dayroot_core::{DayrootError, DayrootResult};

/// SHA-256 of a file's bytes, lowercase hex.
pub fn file_sha256_hex(path: &Path) -> DayrootResult<String> {
    Ok(sha256_hex(&fs::read(path)?))
}

/// Generate the manifest over the named files inside `bundle_dir`.
///
/// `file_names` are paths relative to the bundle directory. The entries are
/// sorted by path; `core_spec.json` and `profile.json` must be among them.
pub fn generate(
    date: &str,
    bundle_dir: &Path,
    file_names: &[String],
    daily_root: &str,
) -> DayrootResult<Manifest> {
    let mut names = file_names.to_vec();
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in &names {
        let bytes = fs::read(bundle_dir.join(name))?;
        files.push(ManifestFile {
            path: name.clone(),
            sha256: sha256_hex(&bytes),
            size: bytes.len() as u64,
        });
    }

    let digest_of = |target: &str| -> DayrootResult<String> {
        files
            .iter()
            .find(|f| f.path == target)
            .map(|f| f.sha256.clone())
            .ok_or_else(|| {
                DayrootError::InvalidRecord(format!("manifest input set is missing {target}"))
            })
    };

    let core_spec_sha256 = digest_of("core_spec.json")?;
    let profile_sha256 = digest_of("profile.json")?;

    Ok(Manifest {
        version: ARTIFACT_VERSION.to_string(),
        date: date.to_string(),
        files,
        core_spec_sha256,
        profile_sha256,
        daily_root_sha256: daily_root.to_string(),
    })
}
