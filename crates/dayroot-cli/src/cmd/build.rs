use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use dayroot_builder::BuildOptions;

use crate::output;

#[derive(Debug, Serialize)]
pub struct BuildOut {
    pub date: String,
    pub records: usize,
    pub record_files: usize,
    pub daily_root: String,
    pub bundle_dir: String,
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    input: &Path,
    profile_dir: &Path,
    profile_id: &str,
    date: &str,
    out_dir: &Path,
    remote_url: Option<String>,
    prev_checkpoint: Option<PathBuf>,
) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb.set_message("loading profile");
    let profile = dayroot_builder::load_profile(profile_dir, profile_id)?;

    pb.set_message("loading records");
    let records = dayroot_builder::load_records(input)?;

    pb.set_message("building bundle");
    let options = BuildOptions {
        remote_url,
        prev_checkpoint,
    };
    let report = dayroot_builder::build_bundle(records, &profile, date, out_dir, &options).await?;

    pb.finish_and_clear();

    let out = BuildOut {
        date: report.date,
        records: report.records_count,
        record_files: report.record_files,
        daily_root: report.daily_root,
        bundle_dir: report.bundle_dir.display().to_string(),
    };
    output::print(&out)?;
    output::line("bundle built");
    output::line(&format!("  date:       {}", out.date));
    output::line(&format!("  records:    {}", out.records));
    output::line(&format!("  daily root: {}", out.daily_root));
    output::line(&format!("  output:     {}", out.bundle_dir));
    Ok(())
}
