use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "dayroot", version, about = "dayroot proof bundle CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a proof bundle for one calendar day.
    Build {
        /// Input JSONL record stream.
        #[arg(long)]
        input: PathBuf,

        /// Directory containing profile definitions.
        #[arg(long)]
        profile_dir: PathBuf,

        /// Profile id to canonicalize under.
        #[arg(long, default_value = "domain-onchain-payments")]
        profile: String,

        /// Bundle date (YYYY-MM-DD, UTC).
        #[arg(long)]
        date: String,

        /// Output directory; the bundle lands under proofs/<date>/.
        #[arg(long, default_value = "./dist")]
        out: PathBuf,

        /// Published base URL; enables the remote append-only guard.
        #[arg(long)]
        remote_url: Option<String>,

        /// Previous day's checkpoint.json, for chain continuity.
        #[arg(long)]
        prev_checkpoint: Option<PathBuf>,
    },

    /// Check an existing bundle against its published counterpart.
    Check {
        /// Bundle directory (proofs/<date>/).
        #[arg(long)]
        bundle_dir: PathBuf,

        /// Published base URL to compare against.
        #[arg(long)]
        remote_url: Option<String>,
    },

    /// Regenerate and re-verify inclusion proofs for an existing bundle.
    Proofs {
        /// Bundle directory (proofs/<date>/).
        #[arg(long)]
        bundle_dir: PathBuf,

        /// Directory containing profile definitions.
        #[arg(long)]
        profile_dir: PathBuf,

        /// Profile id the bundle was built under.
        #[arg(long, default_value = "domain-onchain-payments")]
        profile: String,
    },

    /// Verify a single inclusion proof file.
    Verify {
        /// Proof JSON file (proofs/<i>.json).
        #[arg(long)]
        proof: PathBuf,

        /// Expected root; defaults to the root embedded in the proof.
        #[arg(long)]
        root: Option<String>,

        /// Leaf hash; defaults to the leaf embedded in the proof.
        #[arg(long)]
        leaf: Option<String>,
    },
}
