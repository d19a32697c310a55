//! Ontolock Core - change control for the security-relevant API surface
//!
//! This crate holds the pure, synchronous part of ontolock:
//! - Live API definition model and structural validation
//! - Schema introspection across dialects and canonicalization
//! - Snapshot extraction and the deterministic content hash
//! - The snapshot diff engine and its human-readable summary
//! - The startup gate state machine and the review workflow interface
//!
//! Persistence lives in `ontolock-store`; orchestration in `ontolock-engine`.

pub mod definition;
pub mod diff;
pub mod errors;
pub mod gate;
pub mod logging_facility;
pub mod review;
pub mod schema;
pub mod snapshot;

// Re-export commonly used types
pub use definition::{ApiDefinition, DefinitionBuilder, FunctionDef, HandlerRef};
pub use diff::{diff_snapshots, render_human_summary, ChangeKind, ChangeRecord, Changeset};
pub use errors::{DefinitionError, ExError, ExErrorKind, Result, SchemaConversionError};
pub use gate::{evaluate, GateAction, GateDecision, GateState, Mode};
pub use review::{AutoApprove, RejectAll, ReviewDecision, ReviewWorkflow};
pub use snapshot::{extract_snapshot, hash_snapshot, ApiSurfaceSnapshot};
