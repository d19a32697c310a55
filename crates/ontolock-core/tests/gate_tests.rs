//! Gate decisions over real snapshot hashes.

mod common;

use common::{snapshot_of, users_definition, with_function};
use ontolock_core::errors::ExErrorKind;
use ontolock_core::gate::{evaluate, GateAction, GateState, Mode};
use ontolock_core::snapshot::hash_snapshot;

#[test]
fn test_missing_lock_in_production_fails_closed() {
    let current = hash_snapshot(&snapshot_of(&users_definition())).unwrap();
    let decision = evaluate(None, &current, Mode::Production);
    assert_eq!(decision.state, GateState::NoLock);
    assert_eq!(decision.action, GateAction::Fail);
    assert_eq!(decision.error_kind(), Some(ExErrorKind::MissingLock));
}

#[test]
fn test_matching_lock_proceeds() {
    let current = hash_snapshot(&snapshot_of(&users_definition())).unwrap();
    let stored = current.clone();
    for mode in [Mode::Development, Mode::Production] {
        let decision = evaluate(Some(&stored), &current, mode);
        assert_eq!(decision.state, GateState::LockMatches);
        assert_eq!(decision.action, GateAction::Proceed);
    }
}

#[test]
fn test_drift_warns_in_development_only() {
    let stored = hash_snapshot(&snapshot_of(&users_definition())).unwrap();
    let current =
        hash_snapshot(&snapshot_of(&with_function(users_definition(), "listUsers"))).unwrap();

    let dev = evaluate(Some(&stored), &current, Mode::Development);
    assert_eq!(dev.state, GateState::LockMismatch);
    assert_eq!(dev.action, GateAction::Warn);

    let prod = evaluate(Some(&stored), &current, Mode::Production);
    assert_eq!(prod.action, GateAction::Fail);
    assert_eq!(prod.error_kind(), Some(ExErrorKind::LockMismatch));
}
