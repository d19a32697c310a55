//! Interactive review on the terminal

use ontolock_core::diff::{render_human_summary, Changeset};
use ontolock_core::errors::{ExError, ExErrorKind};
use ontolock_core::review::{ReviewDecision, ReviewWorkflow};
use ontolock_store::lock::lock_path;
use std::io::{BufRead, Write};
use std::path::Path;

/// Shows the changeset on stderr and asks for `y`/`N` on stdin
pub struct PromptReview;

impl ReviewWorkflow for PromptReview {
    fn review(&self, changeset: &Changeset, dir: &Path) -> Result<ReviewDecision, ExError> {
        let io_err = |e: std::io::Error| {
            ExError::new(ExErrorKind::Io)
                .with_op("review")
                .with_message(e.to_string())
        };

        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{}", render_human_summary(changeset)).map_err(io_err)?;
        write!(
            stderr,
            "\nApprove these changes and write {}? [y/N] ",
            lock_path(dir).display()
        )
        .map_err(io_err)?;
        stderr.flush().map_err(io_err)?;

        let mut answer = String::new();
        let read = std::io::stdin().lock().read_line(&mut answer).map_err(io_err)?;
        if read == 0 {
            return Err(ExError::new(ExErrorKind::ReviewUnavailable)
                .with_op("review")
                .with_message("no answer on stdin; use --yes to approve non-interactively"));
        }

        let approved = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
        Ok(ReviewDecision { approved })
    }
}
