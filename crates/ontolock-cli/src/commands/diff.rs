//! Diff command
//!
//! Usage: ontolock diff --definition <FILE> [--dir <DIR>] [--json]

use super::{TargetArgs, EXIT_OK};
use clap::Args;
use ontolock_core::diff::render_human_summary;
use ontolock_engine::approval::check;

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the changeset as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs) -> anyhow::Result<i32> {
    let target = args.target.resolve()?;
    let changeset = check(&target.definition, &target.config.lock_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changeset)?);
    } else {
        print!("{}", render_human_summary(&changeset));
    }
    Ok(EXIT_OK)
}
