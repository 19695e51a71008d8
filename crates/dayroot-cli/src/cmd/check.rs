use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct CheckOut {
    pub bundle_dir: String,
    pub ok: bool,
}

pub async fn run(bundle_dir: &Path, remote_url: Option<&str>) -> Result<()> {
    dayroot_builder::check_append_only(bundle_dir, remote_url).await?;

    output::print(&CheckOut {
        bundle_dir: bundle_dir.display().to_string(),
        ok: true,
    })?;
    output::line("append-only check passed");
    Ok(())
}
