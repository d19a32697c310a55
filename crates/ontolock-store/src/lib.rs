//! Ontolock Store - persistence of the approved API surface
//!
//! Provides:
//! - The lock record (`ontology.lock.json`) read/write contract
//! - Atomic temp-then-rename file writes
//! - Optimistic-concurrency writes for the approval path

pub mod atomic;
pub mod errors;
pub mod lock;

// Re-export key types
pub use errors::Result;
pub use lock::{LockRecord, LOCK_FILE_NAME, LOCK_VERSION};
