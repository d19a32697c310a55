//! Marker discovery over canonical schema trees.
//!
//! Wrapper nodes (`optional`, `nullable`, `default`) are transparent; array
//! elements append `[]` to the path and object properties append `.name`.

use crate::schema::canonical::{join_path, CANONICAL_IDENTITY_CONTEXT, CANONICAL_SOURCED_FROM};
use serde_json::Value;

/// A field carrying at least one marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedField {
    pub path: String,
    pub sourced_from: Option<String>,
    pub identity_context: bool,
}

/// Collect every marked field of a canonical tree, in traversal order.
pub fn marked_fields(tree: &Value) -> Vec<MarkedField> {
    let mut out = Vec::new();
    walk(tree, "", &mut out);
    out
}

fn walk(node: &Value, path: &str, out: &mut Vec<MarkedField>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    let sourced_from = obj
        .get(CANONICAL_SOURCED_FROM)
        .and_then(Value::as_str)
        .map(str::to_string);
    let identity_context = obj
        .get(CANONICAL_IDENTITY_CONTEXT)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if sourced_from.is_some() || identity_context {
        out.push(MarkedField {
            path: path.to_string(),
            sourced_from,
            identity_context,
        });
    }

    match obj.get("type").and_then(Value::as_str) {
        Some("object") => {
            if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
                for (name, child) in properties {
                    walk(child, &join_path(path, name), out);
                }
            }
        }
        Some("array") => {
            if let Some(items) = obj.get("items") {
                walk(items, &format!("{}[]", path), out);
            }
        }
        Some("optional") | Some("nullable") | Some("default") => {
            if let Some(inner) = obj.get("inner") {
                walk(inner, path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::canonical::canonicalize_schema;
    use serde_json::json;

    #[test]
    fn test_paths_through_wrappers_and_arrays() {
        let schema = json!({
            "kind": "object",
            "shape": {
                "filters": {
                    "kind": "optional",
                    "inner": {
                        "kind": "object",
                        "shape": {
                            "ownerId": {"kind": "string", "x-sourced-from": "listUsers"}
                        }
                    }
                },
                "labelIds": {
                    "kind": "array",
                    "element": {"kind": "string", "x-sourced-from": "listLabels"}
                },
                "actorId": {"kind": "string", "x-identity-context": true}
            }
        });
        let tree = canonicalize_schema(&schema).tree;
        let mut fields = marked_fields(&tree);
        fields.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(
            fields,
            vec![
                MarkedField {
                    path: "actorId".to_string(),
                    sourced_from: None,
                    identity_context: true,
                },
                MarkedField {
                    path: "filters.ownerId".to_string(),
                    sourced_from: Some("listUsers".to_string()),
                    identity_context: false,
                },
                MarkedField {
                    path: "labelIds[]".to_string(),
                    sourced_from: Some("listLabels".to_string()),
                    identity_context: false,
                },
            ]
        );
    }

    #[test]
    fn test_unknown_nodes_are_tolerated() {
        let tree = json!({"type": "object", "properties": {"x": {"type": "unknown"}}});
        assert!(marked_fields(&tree).is_empty());
        assert!(marked_fields(&json!("garbage")).is_empty());
    }
}
