//! Gate command
//!
//! Run before serving. Exit status: 0 to proceed, 2 when the gate fails
//! closed (the diff is printed to stderr), 1 on any other error.

use super::{TargetArgs, EXIT_FAILURE, EXIT_GATE_CLOSED, EXIT_OK};
use crate::prompt::PromptReview;
use clap::Args;
use ontolock_core::diff::render_human_summary;
use ontolock_core::gate::GateAction;
use ontolock_core::logging_facility;
use ontolock_core::review::ReviewWorkflow;
use ontolock_engine::gate::run_startup_gate;

#[derive(Debug, Args)]
pub struct GateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// In development mode, offer to approve drift interactively
    #[arg(long)]
    pub interactive: bool,
}

pub fn execute(args: GateArgs) -> anyhow::Result<i32> {
    let interactive = args.interactive;
    let target = args.target.resolve()?;
    logging_facility::init(target.config.log_profile);

    let review: Option<&dyn ReviewWorkflow> = if interactive {
        Some(&PromptReview)
    } else {
        None
    };

    match run_startup_gate(&target.definition, &target.config, review) {
        Ok(report) => {
            if report.decision.action == GateAction::Warn && !report.lock_written {
                if let Some(changeset) = &report.changeset {
                    eprint!("{}", render_human_summary(changeset));
                }
                eprintln!(
                    "Warning: API surface is not approved ({}); continuing in {} mode",
                    report.decision.state.as_str(),
                    target.config.mode
                );
            }
            println!("{}", report.current_hash);
            Ok(EXIT_OK)
        }
        Err(err) if err.is_mode_dependent() => {
            if let Some(changeset) = err.changeset() {
                eprint!("{}", render_human_summary(changeset));
            }
            eprintln!("Error: {}", err);
            Ok(EXIT_GATE_CLOSED)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(EXIT_FAILURE)
        }
    }
}
