//! Approve command
//!
//! Usage: ontolock approve --definition <FILE> [--dir <DIR>] [--yes]

use super::{TargetArgs, EXIT_FAILURE, EXIT_OK};
use crate::prompt::PromptReview;
use clap::Args;
use ontolock_core::review::{AutoApprove, ReviewWorkflow};
use ontolock_engine::approval::{approve, rejected_error, ApprovalOutcome};

#[derive(Debug, Args)]
pub struct ApproveArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Write the lock without asking
    #[arg(short, long)]
    pub yes: bool,
}

pub fn execute(args: ApproveArgs) -> anyhow::Result<i32> {
    let target = args.target.resolve()?;
    let workflow: &dyn ReviewWorkflow = if args.yes {
        &AutoApprove
    } else {
        &PromptReview
    };

    match approve(&target.definition, &target.config.lock_dir, workflow)? {
        ApprovalOutcome::NoChanges => {
            println!("No changes; lock is up to date");
            Ok(EXIT_OK)
        }
        ApprovalOutcome::Approved(record) => {
            println!("Lock written:");
            println!("  hash: {}", record.hash);
            println!("  approved_at: {}", record.approved_at.to_rfc3339());
            Ok(EXIT_OK)
        }
        ApprovalOutcome::Rejected(changeset) => {
            eprintln!("Error: {}", rejected_error(changeset));
            Ok(EXIT_FAILURE)
        }
    }
}
