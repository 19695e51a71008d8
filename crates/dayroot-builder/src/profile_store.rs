//! Profile loading.
//!
//! Profiles live at `<profile_dir>/<profile_id>/profile.json`. Parsing and
//! validation (including normalizer resolution) happen in `dayroot-core`;
//! a profile that references an unknown rule fails here, before any record
//! is touched.

use std::fs;
use std::path::Path;

use dayroot_core::profile::Profile;
use dayroot_core::{DayrootError, DayrootResult};

pub fn load_profile(profile_dir: &Path, profile_id: &str) -> DayrootResult<Profile> {
    let path = profile_dir.join(profile_id).join("profile.json");
    let bytes = fs::read(&path).map_err(|e| {
        DayrootError::InvalidProfile(format!("cannot read {}: {e}", path.display()))
    })?;
    Profile::from_json_bytes(&bytes)
}
