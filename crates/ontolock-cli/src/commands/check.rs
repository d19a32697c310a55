//! Check command (print only, never prompts)
//!
//! Exit status: 0 when the lock matches, 1 when changes are pending.

use super::{TargetArgs, EXIT_FAILURE, EXIT_OK};
use clap::Args;
use ontolock_core::diff::render_human_summary;
use ontolock_engine::approval::check;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the changeset as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CheckArgs) -> anyhow::Result<i32> {
    let target = args.target.resolve()?;
    let changeset = check(&target.definition, &target.config.lock_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changeset)?);
    } else if changeset.has_changes {
        print!("{}", render_human_summary(&changeset));
    } else {
        println!("API surface matches lock ({})", changeset.new_hash);
    }

    Ok(if changeset.has_changes {
        EXIT_FAILURE
    } else {
        EXIT_OK
    })
}
