use anyhow::Result;

use crate::args::{Cli, Command};

mod build;
mod check;
mod proofs;
mod verify;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            input,
            profile_dir,
            profile,
            date,
            out,
            remote_url,
            prev_checkpoint,
        } => {
            build::run(
                &input,
                &profile_dir,
                &profile,
                &date,
                &out,
                remote_url,
                prev_checkpoint,
            )
            .await
        }
        Command::Check {
            bundle_dir,
            remote_url,
        } => check::run(&bundle_dir, remote_url.as_deref()).await,
        Command::Proofs {
            bundle_dir,
            profile_dir,
            profile,
        } => proofs::run(&bundle_dir, &profile_dir, &profile),
        Command::Verify { proof, root, leaf } => verify::run(&proof, root, leaf),
    }
}
