//! Startup gate scenarios against a real lock directory.

mod common;

use common::{config, users_definition, widened_definition};
use ontolock_core::diff::ChangeKind;
use ontolock_core::errors::ExErrorKind;
use ontolock_core::gate::{GateAction, GateState, Mode};
use ontolock_core::logging_facility::test_capture::init_test_capture;
use ontolock_core::review::{AutoApprove, RejectAll};
use ontolock_core::snapshot::{extract_snapshot, hash_snapshot};
use ontolock_engine::gate::run_startup_gate;
use ontolock_store::lock;
use std::fs;
use tempfile::TempDir;

fn approve_current(dir: &TempDir, def: &ontolock_core::ApiDefinition) -> String {
    let snapshot = extract_snapshot(def);
    let hash = hash_snapshot(&snapshot).unwrap();
    lock::write(dir.path(), &snapshot, &hash).unwrap();
    hash
}

#[test]
fn test_production_without_lock_fails_closed() {
    let dir = TempDir::new().unwrap();
    let err = run_startup_gate(
        &users_definition(),
        &config(dir.path(), Mode::Production),
        Some(&AutoApprove),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::MissingLock);
    let changeset = err.changeset().expect("gate failure carries the diff");
    assert!(changeset.has_changes);
    assert_eq!(changeset.added_groups, vec!["admin", "public"]);
    // Production never consults the reviewer.
    assert!(!lock::exists(dir.path()));
}

#[test]
fn test_matching_lock_proceeds_without_changeset() {
    let dir = TempDir::new().unwrap();
    let def = users_definition();
    let hash = approve_current(&dir, &def);

    let report = run_startup_gate(&def, &config(dir.path(), Mode::Production), None).unwrap();
    assert_eq!(report.decision.state, GateState::LockMatches);
    assert_eq!(report.decision.action, GateAction::Proceed);
    assert!(report.changeset.is_none());
    assert_eq!(report.stored_hash.as_deref(), Some(hash.as_str()));
    assert_eq!(report.current_hash, hash);
}

#[test]
fn test_production_mismatch_carries_changeset() {
    let dir = TempDir::new().unwrap();
    approve_current(&dir, &users_definition());

    let err = run_startup_gate(
        &widened_definition(),
        &config(dir.path(), Mode::Production),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::LockMismatch);
    assert!(err.is_mode_dependent());

    let changeset = err.changeset().unwrap();
    assert_eq!(changeset.added_groups, vec!["support"]);
    let record = changeset.function("getUser").unwrap();
    assert_eq!(record.kind, ChangeKind::Modified);
    assert_eq!(
        record.new_access,
        Some(vec!["admin".to_string(), "support".to_string()])
    );
}

#[test]
fn test_development_without_lock_warns_and_does_not_write() {
    let dir = TempDir::new().unwrap();
    let report = run_startup_gate(
        &users_definition(),
        &config(dir.path(), Mode::Development),
        None,
    )
    .unwrap();

    assert_eq!(report.decision.state, GateState::NoLock);
    assert_eq!(report.decision.action, GateAction::Warn);
    assert!(report.may_serve());
    assert!(report.changeset.is_some());
    assert!(!report.lock_written);
    assert!(!lock::exists(dir.path()));
}

#[test]
fn test_development_mismatch_with_approving_reviewer_writes_lock() {
    let dir = TempDir::new().unwrap();
    approve_current(&dir, &users_definition());
    let def = widened_definition();

    let report =
        run_startup_gate(&def, &config(dir.path(), Mode::Development), Some(&AutoApprove)).unwrap();
    assert_eq!(report.decision.state, GateState::LockMismatch);
    assert!(report.lock_written);

    let stored = lock::read(dir.path()).unwrap().unwrap();
    assert_eq!(stored.hash, report.current_hash);

    // Next start matches.
    let again = run_startup_gate(&def, &config(dir.path(), Mode::Production), None).unwrap();
    assert_eq!(again.decision.state, GateState::LockMatches);
}

#[test]
fn test_development_rejected_review_keeps_lock() {
    let dir = TempDir::new().unwrap();
    let original = approve_current(&dir, &users_definition());

    let report = run_startup_gate(
        &widened_definition(),
        &config(dir.path(), Mode::Development),
        Some(&RejectAll),
    )
    .unwrap();
    assert!(report.may_serve());
    assert!(!report.lock_written);
    assert_eq!(lock::read(dir.path()).unwrap().unwrap().hash, original);
}

#[test]
fn test_development_mismatch_without_reviewer_is_rejected() {
    let dir = TempDir::new().unwrap();
    let original = approve_current(&dir, &users_definition());

    let report = run_startup_gate(
        &widened_definition(),
        &config(dir.path(), Mode::Development),
        None,
    )
    .unwrap();
    assert_eq!(report.decision.state, GateState::LockMismatch);
    assert_eq!(report.decision.action, GateAction::Warn);
    assert!(report.may_serve());
    assert!(!report.lock_written);
    assert_eq!(lock::read(dir.path()).unwrap().unwrap().hash, original);
}

#[test]
fn test_auto_approve_replaces_existing_lock_only() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(dir.path(), Mode::Development);
    cfg.auto_approve = true;

    let first = run_startup_gate(&users_definition(), &cfg, None).unwrap();
    assert_eq!(first.decision.state, GateState::NoLock);
    assert!(!first.lock_written);

    approve_current(&dir, &users_definition());
    let second = run_startup_gate(&widened_definition(), &cfg, None).unwrap();
    assert!(second.lock_written);
}

#[test]
fn test_corrupt_lock_is_fatal_in_development() {
    let dir = TempDir::new().unwrap();
    fs::write(lock::lock_path(dir.path()), "{\"version\": 7}").unwrap();

    let err = run_startup_gate(
        &users_definition(),
        &config(dir.path(), Mode::Development),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::LockParse);
    assert!(!err.is_mode_dependent());
}

#[test]
fn test_invalid_definition_is_fatal_in_development() {
    let dir = TempDir::new().unwrap();
    let mut def = users_definition();
    def.functions.get_mut("getUser").unwrap().access = vec!["ghost".to_string()];

    let err = run_startup_gate(&def, &config(dir.path(), Mode::Development), None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DefinitionInvalid);
}

#[test]
fn test_gate_logs_outcome() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let def = users_definition();
    let hash = approve_current(&dir, &def);

    run_startup_gate(&def, &config(dir.path(), Mode::Production), None).unwrap();

    let matching = capture.count_events(|e| {
        e.is("gate_evaluate", "end")
            && e.field("hash") == Some(hash.as_str())
            && e.field("gate_state") == Some("lock_matches")
    });
    assert!(matching >= 1);
}
