//! API surface snapshots.
//!
//! ## Responsibilities
//!
//! - Define the canonical, security-relevant snapshot schema
//! - Extract a snapshot from a live [`ApiDefinition`](crate::definition::ApiDefinition)
//! - Compute the deterministic content hash
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `ontolock-store`)
//! - Gate orchestration (handled by `ontolock-engine`)

pub mod digest;
pub mod extract;
pub mod model;

pub use digest::{
    canonical_json, canonical_string, canonical_value_string, hash_snapshot, is_valid_hash, HASH_LEN,
};
pub use extract::{collect_identity_fields, extract_snapshot};
pub use model::{ApiSurfaceSnapshot, FieldReference, FunctionShape};
