//! Change-control gate state machine.
//!
//! Evaluated once per process start. Pure: the caller supplies the stored
//! hash (if a lock exists), the live hash and the mode, and acts on the
//! returned [`GateDecision`].
//!
//! | state          | development | production |
//! |----------------|-------------|------------|
//! | `NoLock`       | Warn        | Fail       |
//! | `LockMatches`  | Proceed     | Proceed    |
//! | `LockMismatch` | Warn        | Fail       |

use crate::errors::{ExError, ExErrorKind};
use std::fmt;
use std::str::FromStr;

/// Operating mode.
///
/// Defaults to [`Mode::Production`]: unapproved drift fails closed unless
/// development mode is selected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_mode")
                .with_message(format!(
                    "unknown mode '{}', expected development or production",
                    other
                ))),
        }
    }
}

/// Where the live surface stands relative to the approved one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NoLock,
    LockMatches,
    LockMismatch,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::NoLock => "no_lock",
            GateState::LockMatches => "lock_matches",
            GateState::LockMismatch => "lock_mismatch",
        }
    }
}

/// What the caller must do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Start serving
    Proceed,
    /// Start serving, but surface the changeset to the operator
    Warn,
    /// Refuse to serve
    Fail,
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateAction::Proceed => "proceed",
            GateAction::Warn => "warn",
            GateAction::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub state: GateState,
    pub action: GateAction,
}

impl GateDecision {
    /// `true` unless the gate fails closed
    pub fn may_serve(&self) -> bool {
        self.action != GateAction::Fail
    }

    /// The error kind describing an unapproved surface, if any
    pub fn error_kind(&self) -> Option<ExErrorKind> {
        match self.state {
            GateState::NoLock => Some(ExErrorKind::MissingLock),
            GateState::LockMismatch => Some(ExErrorKind::LockMismatch),
            GateState::LockMatches => None,
        }
    }
}

/// Evaluate the gate.
///
/// `stored_hash` is `None` when no lock record exists.
pub fn evaluate(stored_hash: Option<&str>, current_hash: &str, mode: Mode) -> GateDecision {
    let state = match stored_hash {
        None => GateState::NoLock,
        Some(stored) if stored == current_hash => GateState::LockMatches,
        Some(_) => GateState::LockMismatch,
    };
    let action = match (state, mode) {
        (GateState::LockMatches, _) => GateAction::Proceed,
        (_, Mode::Development) => GateAction::Warn,
        (_, Mode::Production) => GateAction::Fail,
    };
    GateDecision { state, action }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H1: &str = "0123456789abcdef";
    const H2: &str = "fedcba9876543210";

    #[test]
    fn test_matching_lock_proceeds_in_both_modes() {
        for mode in [Mode::Development, Mode::Production] {
            let decision = evaluate(Some(H1), H1, mode);
            assert_eq!(decision.state, GateState::LockMatches);
            assert_eq!(decision.action, GateAction::Proceed);
            assert_eq!(decision.error_kind(), None);
        }
    }

    #[test]
    fn test_production_fails_closed() {
        let missing = evaluate(None, H1, Mode::Production);
        assert_eq!(missing.action, GateAction::Fail);
        assert_eq!(missing.error_kind(), Some(ExErrorKind::MissingLock));
        assert!(!missing.may_serve());

        let mismatch = evaluate(Some(H1), H2, Mode::Production);
        assert_eq!(mismatch.state, GateState::LockMismatch);
        assert_eq!(mismatch.action, GateAction::Fail);
    }

    #[test]
    fn test_development_warns() {
        assert_eq!(evaluate(None, H1, Mode::Development).action, GateAction::Warn);
        let mismatch = evaluate(Some(H1), H2, Mode::Development);
        assert_eq!(mismatch.action, GateAction::Warn);
        assert!(mismatch.may_serve());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!(" Production ".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!(Mode::default(), Mode::Production);
        let err = "staging".parse::<Mode>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
