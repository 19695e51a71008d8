//! Append-only guard.
//!
//! A day, once published, is immutable: rebuilding it must reproduce the
//! published content. Before a bundle is finalized the guard compares the
//! newly computed root against any manifest already on disk for that date
//! and, when a remote is configured, against the published manifest at
//! `<remote_url>/proofs/<date>/manifest.json`.
//!
//! The fetch fails closed: only a well-formed 404 means "no prior
//! publication". Transport errors and unexpected statuses are
//! `RemoteUnavailable`, never silently treated as absence. The guard never
//! mutates remote state; immutability enforcement at the hosting layer is
//! external.

use std::fs;
use std::path::Path;

use tracing::debug;
use url::Url;

use dayroot_core::model::Manifest;
use dayroot_core::{DayrootError, DayrootResult};

/// Load the manifest already present in a bundle directory, if any.
pub fn local_manifest(bundle_dir: &Path) -> DayrootResult<Option<Manifest>> {
    let path = bundle_dir.join("manifest.json");
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

fn manifest_url(remote_url: &str, date: &str) -> DayrootResult<Url> {
    let raw = format!("{}/proofs/{date}/manifest.json", remote_url.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| DayrootError::RemoteUnavailable {
        url: raw,
        cause: e.to_string(),
    })
}

/// Fetch a previously published manifest. `Ok(None)` means a clean 404.
pub async fn fetch_remote_manifest(
    remote_url: &str,
    date: &str,
) -> DayrootResult<Option<Manifest>> {
    let url = manifest_url(remote_url, date)?;
    debug!(%url, "fetching published manifest");

    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| DayrootError::RemoteUnavailable {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(DayrootError::RemoteUnavailable {
            url: url.to_string(),
            cause: format!("unexpected status {status}"),
        });
    }

    let manifest = response
        .json::<Manifest>()
        .await
        .map_err(|e| DayrootError::RemoteUnavailable {
            url: url.to_string(),
            cause: format!("invalid manifest body: {e}"),
        })?;
    Ok(Some(manifest))
}

/// Guard a build about to finalize: the computed root must match whatever is
/// already published for that date, locally or remotely.
pub async fn preflight(
    bundle_dir: &Path,
    date: &str,
    computed_root: &str,
    remote_url: Option<&str>,
) -> DayrootResult<()> {
    if let Some(existing) = local_manifest(bundle_dir)? {
        if existing.daily_root_sha256 != computed_root {
            return Err(DayrootError::AppendOnlyViolation {
                date: date.to_string(),
                local_digest: computed_root.to_string(),
                remote_digest: existing.daily_root_sha256,
            });
        }
    }

    if let Some(base) = remote_url {
        if let Some(published) = fetch_remote_manifest(base, date).await? {
            if published.daily_root_sha256 != computed_root {
                return Err(DayrootError::AppendOnlyViolation {
                    date: date.to_string(),
                    local_digest: computed_root.to_string(),
                    remote_digest: published.daily_root_sha256,
                });
            }
        }
    }

    Ok(())
}

/// Standalone check of an existing local bundle against its published
/// counterpart. Absence of either side is permitted (first publication).
pub async fn check_append_only(bundle_dir: &Path, remote_url: Option<&str>) -> DayrootResult<()> {
    let Some(local) = local_manifest(bundle_dir)? else {
        return Ok(());
    };

    if let Some(base) = remote_url {
        if let Some(published) = fetch_remote_manifest(base, &local.date).await? {
            if published.daily_root_sha256 != local.daily_root_sha256 {
                return Err(DayrootError::AppendOnlyViolation {
                    date: local.date,
                    local_digest: local.daily_root_sha256,
                    remote_digest: published.daily_root_sha256,
                });
            }
        }
    }

    Ok(())
}
