//! Snapshot diff computation.
//!
//! The entry point is [`diff_snapshots`], which compares the approved snapshot
//! (absent on first run) against the live one.

use crate::diff::model::{ChangeKind, ChangeRecord, Changeset};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::snapshot::digest::{canonical_value_string, hash_snapshot};
use crate::snapshot::model::{ApiSurfaceSnapshot, FunctionShape};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compute a set-delta between two lists.
///
/// Returns `(added, removed)` where added = in b but not a, removed = in a but not b.
/// Membership decides, list order does not.
fn set_delta(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let set_a: BTreeSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: BTreeSet<&str> = b.iter().map(|s| s.as_str()).collect();
    let added: Vec<String> = set_b.difference(&set_a).map(|s| s.to_string()).collect();
    let removed: Vec<String> = set_a.difference(&set_b).map(|s| s.to_string()).collect();
    (added, removed)
}

fn same_members(a: &[String], b: &[String]) -> bool {
    let (added, removed) = set_delta(a, b);
    added.is_empty() && removed.is_empty()
}

/// Structural equality of two canonical trees, via their canonical text
fn same_tree(a: &Value, b: &Value) -> Result<bool> {
    Ok(canonical_value_string(a)? == canonical_value_string(b)?)
}

fn same_optional_tree(a: Option<&Value>, b: Option<&Value>) -> Result<bool> {
    match (a, b) {
        (None, None) => Ok(true),
        (Some(a), Some(b)) => same_tree(a, b),
        _ => Ok(false),
    }
}

fn added_record(name: &str, shape: &FunctionShape) -> ChangeRecord {
    let mut record = ChangeRecord::new(name, ChangeKind::Added);
    record.new_access = Some(shape.access.clone());
    record.new_description = Some(shape.description.clone());
    record.new_entities = Some(shape.entities.clone());
    record
}

fn removed_record(name: &str, shape: &FunctionShape) -> ChangeRecord {
    let mut record = ChangeRecord::new(name, ChangeKind::Removed);
    record.old_access = Some(shape.access.clone());
    record.old_description = Some(shape.description.clone());
    record.old_entities = Some(shape.entities.clone());
    record
}

/// Compare two shapes of the same function; `None` if nothing relevant differs.
fn modified_record(
    name: &str,
    old: &FunctionShape,
    new: &FunctionShape,
) -> Result<Option<ChangeRecord>> {
    let mut record = ChangeRecord::new(name, ChangeKind::Modified);
    let mut changed = false;

    if !same_members(&old.access, &new.access) {
        record.old_access = Some(old.access.clone());
        record.new_access = Some(new.access.clone());
        changed = true;
    }
    if old.description != new.description {
        record.old_description = Some(old.description.clone());
        record.new_description = Some(new.description.clone());
        changed = true;
    }
    if !same_members(&old.entities, &new.entities) {
        record.old_entities = Some(old.entities.clone());
        record.new_entities = Some(new.entities.clone());
        changed = true;
    }
    if !same_tree(&old.inputs_schema, &new.inputs_schema)? {
        record.inputs_changed = Some(true);
        changed = true;
    }
    if !same_optional_tree(old.outputs_schema.as_ref(), new.outputs_schema.as_ref())? {
        record.outputs_changed = Some(true);
        changed = true;
    }
    if old.field_references != new.field_references {
        record.field_references_changed = Some(true);
        changed = true;
    }
    if old.uses_identity_context != new.uses_identity_context {
        record.identity_context_changed = Some(true);
        changed = true;
    }

    Ok(changed.then_some(record))
}

/// Compute a structured, deterministic diff between two snapshots.
///
/// With no `old` snapshot (first run) every group, entity and function of
/// `new` is reported as added and `has_changes` is true unconditionally.
///
/// `functions` follows the new snapshot's name order, then removed names.
/// That order carries no meaning; compare records by name.
///
/// # Errors
///
/// - `Serialization`: a snapshot could not be serialized for hashing or comparison
/// - `Internal`: the computed changeset fails its JSON round-trip check
pub fn diff_snapshots(
    old: Option<&ApiSurfaceSnapshot>,
    new: &ApiSurfaceSnapshot,
) -> Result<Changeset> {
    let new_hash = hash_snapshot(new)?;

    let changeset = match old {
        None => Changeset {
            has_changes: true,
            old_name: None,
            added_groups: new.access_groups.clone(),
            removed_groups: Vec::new(),
            added_entities: new.entities.clone(),
            removed_entities: Vec::new(),
            functions: new
                .functions
                .iter()
                .map(|(name, shape)| added_record(name, shape))
                .collect(),
            new_snapshot: new.clone(),
            new_hash,
        },
        Some(old) => {
            let old_name = (old.name != new.name).then(|| old.name.clone());
            let (added_groups, removed_groups) =
                set_delta(&old.access_groups, &new.access_groups);
            let (added_entities, removed_entities) = set_delta(&old.entities, &new.entities);

            let mut functions = Vec::new();
            for (name, new_shape) in &new.functions {
                match old.functions.get(name) {
                    None => functions.push(added_record(name, new_shape)),
                    Some(old_shape) => {
                        if let Some(record) = modified_record(name, old_shape, new_shape)? {
                            functions.push(record);
                        }
                    }
                }
            }
            for (name, old_shape) in &old.functions {
                if !new.functions.contains_key(name) {
                    functions.push(removed_record(name, old_shape));
                }
            }

            let has_changes = old_name.is_some()
                || !added_groups.is_empty()
                || !removed_groups.is_empty()
                || !added_entities.is_empty()
                || !removed_entities.is_empty()
                || !functions.is_empty();

            Changeset {
                has_changes,
                old_name,
                added_groups,
                removed_groups,
                added_entities,
                removed_entities,
                functions,
                new_snapshot: new.clone(),
                new_hash,
            }
        }
    };

    // Determinism guard: round-trip through JSON must produce an equal struct
    let serialized = serde_json::to_string(&changeset).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("diff_snapshots")
            .with_message(format!("failed to serialize changeset: {}", e))
    })?;
    let reparsed: Changeset = serde_json::from_str(&serialized).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("diff_snapshots")
            .with_message(format!("failed to re-parse changeset: {}", e))
    })?;
    if reparsed != changeset {
        return Err(ExError::new(ExErrorKind::Internal)
            .with_op("diff_snapshots")
            .with_message("changeset is not deterministic: round-trip produced different struct"));
    }

    Ok(changeset)
}
