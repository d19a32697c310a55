//! Explicit approval and print-only checks.
//!
//! These back the `approve` and `check` commands. Unlike the startup gate
//! they ignore the operating mode: approving is always an explicit act.

#![allow(clippy::result_large_err)]

use ontolock_core::definition::ApiDefinition;
use ontolock_core::diff::{diff_snapshots, Changeset};
use ontolock_core::errors::{ExError, ExErrorKind};
use ontolock_core::review::ReviewWorkflow;
use ontolock_core::snapshot::extract_snapshot;
use ontolock_core::{log_op_end, log_op_error, log_op_start};
use ontolock_store::lock::{self, LockRecord};
use std::path::Path;

/// Result of an approval attempt
#[derive(Debug, Clone)]
pub enum ApprovalOutcome {
    /// The lock already matches the live surface; nothing was written
    NoChanges,
    /// The reviewer approved and the lock was written
    Approved(LockRecord),
    /// The reviewer declined; the lock is untouched
    Rejected(Changeset),
}

impl ApprovalOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApprovalOutcome::Rejected(_))
    }
}

/// Diff the live definition against the lock in `dir`.
///
/// # Errors
///
/// - `DefinitionInvalid`: the definition is structurally invalid
/// - `LockParse`: the lock record is corrupt
pub fn check(definition: &ApiDefinition, dir: &Path) -> Result<Changeset, ExError> {
    Ok(pending(definition, dir)?.0)
}

fn pending(definition: &ApiDefinition, dir: &Path) -> Result<(Changeset, Option<String>), ExError> {
    definition.validate()?;
    let snapshot = extract_snapshot(definition);
    let stored = lock::read(dir)?;
    let changeset = diff_snapshots(stored.as_ref().map(|r| &r.snapshot), &snapshot)?;
    Ok((changeset, stored.map(|r| r.hash)))
}

/// Present pending changes to `workflow` and write the lock on approval.
///
/// The write is refused if another writer changed the lock while the
/// reviewer was deciding.
///
/// # Errors
///
/// - anything [`check`] returns
/// - whatever the workflow returns (for example `ReviewUnavailable`)
/// - `Concurrency`: the lock changed during review
pub fn approve(
    definition: &ApiDefinition,
    dir: &Path,
    workflow: &dyn ReviewWorkflow,
) -> Result<ApprovalOutcome, ExError> {
    log_op_start!("approve", lock_path = %dir.display());
    let start = std::time::Instant::now();

    let result = approve_inner(definition, dir, workflow);
    match &result {
        Ok(outcome) => {
            let outcome_name = match outcome {
                ApprovalOutcome::NoChanges => "no_changes",
                ApprovalOutcome::Approved(_) => "approved",
                ApprovalOutcome::Rejected(_) => "rejected",
            };
            log_op_end!(
                "approve",
                duration_ms = start.elapsed().as_millis() as u64,
                outcome = outcome_name
            );
        }
        Err(err) => {
            log_op_error!(
                "approve",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn approve_inner(
    definition: &ApiDefinition,
    dir: &Path,
    workflow: &dyn ReviewWorkflow,
) -> Result<ApprovalOutcome, ExError> {
    let (changeset, stored_hash) = pending(definition, dir)?;

    if stored_hash.as_deref() == Some(changeset.new_hash.as_str()) {
        return Ok(ApprovalOutcome::NoChanges);
    }

    let decision = workflow.review(&changeset, dir)?;
    if !decision.approved {
        return Ok(ApprovalOutcome::Rejected(changeset));
    }

    let record = lock::write_if_current(
        dir,
        &changeset.new_snapshot,
        &changeset.new_hash,
        stored_hash.as_deref(),
    )?;
    tracing::info!(
        op = "approve",
        hash = record.hash.as_str(),
        change_count = changeset.change_count() as u64,
        "API surface approved"
    );
    Ok(ApprovalOutcome::Approved(record))
}

/// Convert a rejected outcome into a `ReviewRejected` error carrying the changeset
pub fn rejected_error(changeset: Changeset) -> ExError {
    ExError::new(ExErrorKind::ReviewRejected)
        .with_op("approve")
        .with_message("pending API surface changes were not approved")
        .with_changeset(changeset)
}
