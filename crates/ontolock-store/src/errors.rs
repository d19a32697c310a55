//! Error handling for ontolock-store
//!
//! Wraps ontolock-core ExError with store-specific helpers

use ontolock_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a lock parse error for a corrupt or unsupported record
pub fn lock_parse_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::LockParse)
        .with_op("lock_read")
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create a concurrency error: the lock changed under an approving writer
pub fn concurrency_error(path: &Path, expected: Option<&str>, actual: Option<&str>) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("lock_write")
        .with_path(path.display().to_string())
        .with_message(format!(
            "Lock changed since it was read: expected {}, found {}",
            expected.unwrap_or("no lock"),
            actual.unwrap_or("no lock")
        ))
}

/// Create an error for a hash that does not belong to the snapshot being written
pub fn hash_mismatch(expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("lock_write")
        .with_message(format!(
            "Hash {} does not match snapshot (computed {})",
            actual, expected
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_error_names_both_sides() {
        let err = concurrency_error(Path::new("ontology.lock.json"), None, Some("0123456789abcdef"));
        assert_eq!(err.kind(), ExErrorKind::Concurrency);
        assert!(err.message().contains("no lock"));
        assert!(err.message().contains("0123456789abcdef"));
        assert_eq!(err.path(), Some("ontology.lock.json"));
    }
}
