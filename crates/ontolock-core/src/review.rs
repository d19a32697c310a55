//! Review workflow interface.
//!
//! A reviewer is shown the pending [`Changeset`] and answers yes or no. On
//! approval the caller commits `changeset.new_snapshot` to the lock store; a
//! reviewer never writes the lock itself.

use crate::diff::model::Changeset;
use crate::errors::ExError;
use std::path::Path;

/// Outcome of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDecision {
    pub approved: bool,
}

impl ReviewDecision {
    pub fn approve() -> Self {
        Self { approved: true }
    }

    pub fn reject() -> Self {
        Self { approved: false }
    }
}

/// Presents a changeset for human (or scripted) approval.
///
/// Implementations may block indefinitely waiting on a person.
#[allow(clippy::result_large_err)]
pub trait ReviewWorkflow: Send + Sync {
    /// Review the changeset for the lock in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::ReviewUnavailable` if no decision can be obtained
    /// (for example, no terminal is attached), or `ExErrorKind::Io` if the
    /// reviewer cannot be reached.
    fn review(&self, changeset: &Changeset, dir: &Path) -> Result<ReviewDecision, ExError>;
}

/// Approves every changeset. Used by `approve --yes`.
pub struct AutoApprove;

impl ReviewWorkflow for AutoApprove {
    fn review(&self, _: &Changeset, _: &Path) -> Result<ReviewDecision, ExError> {
        Ok(ReviewDecision::approve())
    }
}

/// Rejects every changeset.
///
/// The startup gate falls back to this when it is given no reviewer.
pub struct RejectAll;

impl ReviewWorkflow for RejectAll {
    fn review(&self, _: &Changeset, _: &Path) -> Result<ReviewDecision, ExError> {
        Ok(ReviewDecision::reject())
    }
}
