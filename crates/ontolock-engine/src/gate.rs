//! Process-start gate orchestration.
//!
//! ## Pipeline (in order):
//! 1. Validate the definition (always fatal)
//! 2. Extract the snapshot and hash it
//! 3. Read the lock record (a corrupt record is always fatal)
//! 4. Evaluate the gate state machine
//! 5. On drift: compute the changeset
//! 6. Production: fail closed with the changeset attached
//! 7. Development: warn, optionally review, write on approval
//!
//! Runs once per process start; nothing here is re-entered per request.

#![allow(clippy::result_large_err)]

use crate::config::GateConfig;
use ontolock_core::definition::ApiDefinition;
use ontolock_core::diff::{diff_snapshots, render_human_summary, Changeset};
use ontolock_core::errors::{ExError, ExErrorKind};
use ontolock_core::gate::{evaluate, GateAction, GateDecision, GateState};
use ontolock_core::review::{RejectAll, ReviewWorkflow};
use ontolock_core::snapshot::{extract_snapshot, hash_snapshot};
use ontolock_core::{log_op_end, log_op_error, log_op_start};
use ontolock_store::lock;

/// What the gate decided and did
#[derive(Debug, Clone)]
pub struct GateReport {
    pub decision: GateDecision,
    pub current_hash: String,
    pub stored_hash: Option<String>,
    /// Present whenever the live surface differs from the approved one
    pub changeset: Option<Changeset>,
    /// Whether a reviewer approved and the lock was rewritten
    pub lock_written: bool,
}

impl GateReport {
    pub fn may_serve(&self) -> bool {
        self.decision.may_serve()
    }
}

/// Run the startup gate for `definition`.
///
/// `review` is consulted only in development mode when drift is detected and
/// auto-approve does not apply; `None` means [`RejectAll`]. Auto-approve only
/// replaces an existing lock. A rejected or unavailable review does not stop
/// a development server; it only means the lock is left as is.
///
/// # Errors
///
/// - `DefinitionInvalid`: the definition is structurally invalid
/// - `LockParse`: the lock record is corrupt
/// - `MissingLock` / `LockMismatch`: production mode and the surface is not
///   approved; the error carries the changeset
/// - `Concurrency`: another writer replaced the lock during review
pub fn run_startup_gate(
    definition: &ApiDefinition,
    config: &GateConfig,
    review: Option<&dyn ReviewWorkflow>,
) -> Result<GateReport, ExError> {
    log_op_start!(
        "gate_evaluate",
        mode = config.mode.as_str(),
        lock_path = %config.lock_dir.display()
    );
    let start = std::time::Instant::now();

    match gate_pipeline(definition, config, review) {
        Ok(report) => {
            log_op_end!(
                "gate_evaluate",
                duration_ms = start.elapsed().as_millis() as u64,
                gate_state = report.decision.state.as_str(),
                hash = report.current_hash.as_str(),
                lock_written = report.lock_written
            );
            Ok(report)
        }
        Err(err) => {
            log_op_error!(
                "gate_evaluate",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn gate_pipeline(
    definition: &ApiDefinition,
    config: &GateConfig,
    review: Option<&dyn ReviewWorkflow>,
) -> Result<GateReport, ExError> {
    definition.validate()?;

    let snapshot = extract_snapshot(definition);
    let current_hash = hash_snapshot(&snapshot)?;

    let stored = lock::read(&config.lock_dir)?;
    let stored_hash = stored.as_ref().map(|r| r.hash.clone());

    let decision = evaluate(stored_hash.as_deref(), &current_hash, config.mode);
    if decision.action == GateAction::Proceed {
        return Ok(GateReport {
            decision,
            current_hash,
            stored_hash,
            changeset: None,
            lock_written: false,
        });
    }

    let changeset = diff_snapshots(stored.as_ref().map(|r| &r.snapshot), &snapshot)?;

    if decision.action == GateAction::Fail {
        let kind = decision.error_kind().unwrap_or(ExErrorKind::LockMismatch);
        let message = match kind {
            ExErrorKind::MissingLock => format!(
                "no approved lock in {}; refusing to serve an unreviewed API surface",
                config.lock_dir.display()
            ),
            _ => format!(
                "API surface hash {} does not match approved {}; refusing to serve",
                current_hash,
                stored_hash.as_deref().unwrap_or("none")
            ),
        };
        return Err(ExError::new(kind)
            .with_op("gate_evaluate")
            .with_path(lock::lock_path(&config.lock_dir).display().to_string())
            .with_message(message)
            .with_changeset(changeset));
    }

    tracing::warn!(
        op = "gate_evaluate",
        gate_state = decision.state.as_str(),
        change_count = changeset.change_count() as u64,
        "API surface is not approved; continuing in development mode"
    );
    tracing::debug!(summary = %render_human_summary(&changeset), "pending changes");

    // The first lock is never written without a reviewer.
    let approved = if config.auto_approve && decision.state == GateState::LockMismatch {
        true
    } else {
        match review.unwrap_or(&RejectAll).review(&changeset, &config.lock_dir) {
            Ok(decision) => decision.approved,
            Err(err) => {
                tracing::warn!(
                    op = "gate_evaluate",
                    err_code = err.code(),
                    "review unavailable; lock left unchanged"
                );
                false
            }
        }
    };

    let mut lock_written = false;
    if approved {
        lock::write_if_current(
            &config.lock_dir,
            &changeset.new_snapshot,
            &changeset.new_hash,
            stored_hash.as_deref(),
        )?;
        lock_written = true;
    }

    Ok(GateReport {
        decision,
        current_hash,
        stored_hash,
        changeset: Some(changeset),
        lock_written,
    })
}
