//! Snapshot diff engine.
//!
//! Compares the approved snapshot (or nothing, on first run) with the live
//! one and produces a categorized [`Changeset`] for review.
//!
//! ## Entry point
//!
//! ```ignore
//! use ontolock_core::diff::{diff_snapshots, render_human_summary};
//!
//! let changeset = diff_snapshots(stored.as_ref(), &current)?;
//! eprintln!("{}", render_human_summary(&changeset));
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotence**: diffing a snapshot against itself reports no changes.
//! - **Set semantics**: groups and entities are compared by membership, not order.
//! - **Minimal records**: a modified function only carries the sub-fields that differ.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::diff_snapshots;
pub use human_summary::render_human_summary;
pub use model::{ChangeKind, ChangeRecord, Changeset};
