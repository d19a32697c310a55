//! Schema introspection and canonicalization.
//!
//! - [`introspect`]: dialect adapters reporting one structural layer at a time
//! - [`canonical`]: conversion to the dialect-independent canonical tree
//! - [`walk`]: marker discovery over canonical trees

pub mod canonical;
pub mod introspect;
pub mod walk;

pub use canonical::{canonicalize_schema, unknown_placeholder, CanonicalSchema, MAX_SCHEMA_DEPTH};
pub use introspect::{
    describe, describe_value, detect_dialect, Dialect, SchemaDescription, SchemaKind, SchemaRef,
    IDENTITY_CONTEXT_MARKER, SOURCED_FROM_MARKER,
};
pub use walk::{marked_fields, MarkedField};
