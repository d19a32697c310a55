//! Hash command
//!
//! Usage: ontolock hash --definition <FILE> [--snapshot]

use super::{TargetArgs, EXIT_OK};
use clap::Args;
use ontolock_core::snapshot::{canonical_json, extract_snapshot, hash_snapshot};

#[derive(Debug, Args)]
pub struct HashArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Also print the canonical snapshot the hash is computed over
    #[arg(long)]
    pub snapshot: bool,
}

pub fn execute(args: HashArgs) -> anyhow::Result<i32> {
    let target = args.target.resolve()?;
    let snapshot = extract_snapshot(&target.definition);
    let hash = hash_snapshot(&snapshot)?;

    if args.snapshot {
        let value = canonical_json(&serde_json::to_value(&snapshot)?);
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    println!("{}", hash);
    Ok(EXIT_OK)
}
