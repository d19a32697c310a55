//! Conversion of introspected schemas into canonical trees.
//!
//! Both supported dialects converge on the same tree, so an input schema
//! rewritten from one dialect to the other hashes identically:
//!
//! ```text
//! {"type": "object", "properties": {name: node}}
//! {"type": "array", "items": node}
//! {"type": "optional" | "nullable", "inner": node}
//! {"type": "default", "inner": node, "default": value}
//! {"type": <scalar>, ...constraints}
//! {"type": "unknown"}
//! ```
//!
//! Field markers survive as `sourcedFrom` / `identityContext` on the
//! outermost node of the field that declared them, including when that node
//! is an `unknown` placeholder.

use crate::errors::SchemaConversionError;
use crate::schema::introspect::{describe, SchemaDescription, SchemaRef};
use serde_json::{json, Map, Value};

/// Maximum nesting depth converted before a subtree is declared unknown
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Canonical key carrying the `x-sourced-from` marker
pub const CANONICAL_SOURCED_FROM: &str = "sourcedFrom";

/// Canonical key carrying the identity-context marker
pub const CANONICAL_IDENTITY_CONTEXT: &str = "identityContext";

/// Result of canonicalizing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSchema {
    /// The canonical tree (possibly containing `unknown` placeholders)
    pub tree: Value,
    /// Conversions absorbed into placeholders, in traversal order
    pub degraded: Vec<SchemaConversionError>,
}

/// Placeholder substituted for anything that could not be converted
pub fn unknown_placeholder() -> Value {
    json!({"type": "unknown"})
}

/// Canonicalize a schema, absorbing per-field failures.
///
/// A node that cannot be converted becomes an `unknown` placeholder and the
/// error is recorded in `degraded`; siblings and enclosing wrappers are
/// unaffected. The placeholder keeps the node's field markers, so a
/// reference on an unconvertible field is still validated and recorded.
pub fn canonicalize_schema(schema: &Value) -> CanonicalSchema {
    let mut degraded = Vec::new();
    let tree = convert(SchemaRef::new(schema), None, "", 0, &mut degraded);
    CanonicalSchema { tree, degraded }
}

fn convert(
    schema: SchemaRef<'_>,
    parent: Option<&Value>,
    path: &str,
    depth: usize,
    degraded: &mut Vec<SchemaConversionError>,
) -> Value {
    if depth > MAX_SCHEMA_DEPTH {
        degraded.push(SchemaConversionError::TooDeep {
            path: display_path(path),
            limit: MAX_SCHEMA_DEPTH,
        });
        return degrade(schema, parent);
    }

    let mut node = Map::new();
    match describe(schema) {
        SchemaDescription::Object { fields } => {
            let mut properties = Map::new();
            for field in fields {
                let field_path = join_path(path, field.name);
                let child = convert(
                    field.schema,
                    Some(schema.value()),
                    &field_path,
                    depth + 1,
                    degraded,
                );
                properties.insert(field.name.to_string(), child);
            }
            node.insert("type".into(), json!("object"));
            node.insert("properties".into(), Value::Object(properties));
        }
        SchemaDescription::Array { element } => {
            let items = convert(
                element,
                Some(schema.value()),
                &format!("{}[]", path),
                depth + 1,
                degraded,
            );
            node.insert("type".into(), json!("array"));
            node.insert("items".into(), items);
        }
        SchemaDescription::Optional { inner } => {
            let inner = convert(inner, Some(schema.value()), path, depth + 1, degraded);
            node.insert("type".into(), json!("optional"));
            node.insert("inner".into(), inner);
        }
        SchemaDescription::Nullable { inner } => {
            let inner = convert(inner, Some(schema.value()), path, depth + 1, degraded);
            node.insert("type".into(), json!("nullable"));
            node.insert("inner".into(), inner);
        }
        SchemaDescription::Default { inner, value } => {
            let inner = convert(inner, Some(schema.value()), path, depth + 1, degraded);
            node.insert("type".into(), json!("default"));
            node.insert("inner".into(), inner);
            node.insert("default".into(), value.clone());
        }
        SchemaDescription::Scalar {
            type_name,
            constraints,
        } => {
            node.insert("type".into(), json!(type_name));
            for (key, value) in constraints {
                node.insert(key.to_string(), value.clone());
            }
        }
        SchemaDescription::Unknown => {
            degraded.push(SchemaConversionError::Unrecognised {
                path: display_path(path),
            });
            return degrade(schema, parent);
        }
    }

    insert_markers(&mut node, schema, parent);
    Value::Object(node)
}

/// Placeholder for `schema`, keeping whatever markers it declares
fn degrade(schema: SchemaRef<'_>, parent: Option<&Value>) -> Value {
    let mut node = Map::new();
    node.insert("type".into(), json!("unknown"));
    insert_markers(&mut node, schema, parent);
    Value::Object(node)
}

/// Peeled layers of one JSON Schema document share the node; emit the
/// markers once, on the outermost layer.
fn insert_markers(node: &mut Map<String, Value>, schema: SchemaRef<'_>, parent: Option<&Value>) {
    let first_layer = parent.map_or(true, |p| !std::ptr::eq(p, schema.value()));
    if !first_layer {
        return;
    }
    if let Some(target) = schema.sourced_from() {
        node.insert(CANONICAL_SOURCED_FROM.into(), json!(target));
    }
    if schema.is_identity_context() {
        node.insert(CANONICAL_IDENTITY_CONTEXT.into(), json!(true));
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
