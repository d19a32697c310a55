//! Snapshot extraction from a live API definition.
//!
//! Captured per function: description, access list, entity list, canonical
//! input/output schema trees, field references and identity-context usage.
//!
//! Deliberately left out: handler references, the authentication handler and
//! access-group/entity descriptions. Changing any of those does not change the
//! contract a caller observes, so none of them requires re-approval.

use crate::definition::{ApiDefinition, FunctionDef};
use crate::schema::{canonicalize_schema, marked_fields, CanonicalSchema};
use crate::snapshot::model::{ApiSurfaceSnapshot, FieldReference, FunctionShape};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Project the security-relevant surface of a definition.
///
/// The definition is expected to have passed
/// [`ApiDefinition::validate`]. Schemas that cannot be converted degrade to
/// `{"type": "unknown"}` placeholders (logged at `warn`) instead of aborting.
pub fn extract_snapshot(definition: &ApiDefinition) -> ApiSurfaceSnapshot {
    let functions: BTreeMap<String, FunctionShape> = definition
        .functions
        .iter()
        .map(|(name, function)| (name.clone(), extract_function(name, function)))
        .collect();

    ApiSurfaceSnapshot {
        name: definition.name.clone(),
        access_groups: definition.access_groups.keys().cloned().collect(),
        entities: definition.entities.keys().cloned().collect(),
        functions,
    }
}

/// Identity-context field paths per function.
///
/// A request-time layer uses these to strip the fields from caller input and
/// inject them from the authenticated identity. Functions without such fields
/// are omitted.
pub fn collect_identity_fields(definition: &ApiDefinition) -> BTreeMap<String, Vec<String>> {
    definition
        .functions
        .iter()
        .filter_map(|(name, function)| {
            let tree = canonicalize_schema(&function.inputs).tree;
            let paths: BTreeSet<String> = marked_fields(&tree)
                .into_iter()
                .filter(|f| f.identity_context)
                .map(|f| f.path)
                .collect();
            if paths.is_empty() {
                None
            } else {
                Some((name.clone(), paths.into_iter().collect()))
            }
        })
        .collect()
}

fn extract_function(name: &str, function: &FunctionDef) -> FunctionShape {
    let inputs_schema = canonical_tree(name, "inputs", &function.inputs);
    let outputs_schema = function
        .outputs
        .as_ref()
        .map(|outputs| canonical_tree(name, "outputs", outputs));

    let mut field_references = BTreeSet::new();
    let mut uses_identity_context = false;
    for field in marked_fields(&inputs_schema) {
        uses_identity_context |= field.identity_context;
        if let Some(function_name) = field.sourced_from {
            field_references.insert(FieldReference {
                path: field.path,
                function_name,
            });
        }
    }

    FunctionShape {
        description: function.description.clone(),
        access: sorted(&function.access),
        entities: sorted(&function.entities),
        inputs_schema,
        outputs_schema,
        field_references: field_references.into_iter().collect(),
        uses_identity_context,
    }
}

fn canonical_tree(function: &str, side: &str, schema: &Value) -> Value {
    let CanonicalSchema { tree, degraded } = canonicalize_schema(schema);
    for err in &degraded {
        tracing::warn!(
            function = function,
            schema = side,
            error = %err,
            "schema degraded to unknown placeholder"
        );
    }
    tree
}

fn sorted(items: &[String]) -> Vec<String> {
    let set: BTreeSet<&String> = items.iter().collect();
    set.into_iter().cloned().collect()
}
