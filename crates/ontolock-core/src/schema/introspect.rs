//! Duck-typed structural introspection of opaque validator schemas.
//!
//! Schemas arrive as `serde_json::Value` documents produced by whatever
//! validation library the API definition was written against. Nothing here
//! depends on that library's types: [`describe`] sniffs the document for the
//! handful of keys each supported dialect uses and reports one structural
//! layer at a time. Unrecognised shapes become [`SchemaDescription::Unknown`];
//! this module never panics and never returns an error.
//!
//! Supported dialects:
//!
//! - [`Dialect::JsonSchema`]: `type`/`properties`/`items`/`anyOf` documents.
//!   A single document can encode several layers (`nullable: true` plus a
//!   `default`), so [`SchemaRef`] tracks which layers were already peeled.
//!   Optionality is declared by the parent object's `required` list.
//! - [`Dialect::Tagged`]: one `kind`-tagged node per layer
//!   (`optional { inner }`, `object { shape }`, ...).

use serde_json::{Map, Value};

/// Marker naming the function a field draws its option set from
pub const SOURCED_FROM_MARKER: &str = "x-sourced-from";

/// Marker flagging a field whose value is injected from the caller's identity
pub const IDENTITY_CONTEXT_MARKER: &str = "x-identity-context";

/// Constraint keys carried through to canonical scalar nodes
pub const SCALAR_CONSTRAINT_KEYS: &[&str] = &[
    "const",
    "enum",
    "format",
    "maxLength",
    "maximum",
    "minLength",
    "minimum",
    "pattern",
];

const SCALAR_TYPES: &[&str] = &["boolean", "integer", "null", "number", "string"];

const TAGGED_SCALAR_KINDS: &[&str] = &[
    "boolean", "date", "enum", "integer", "literal", "null", "number", "string",
];

static ABSENT: Value = Value::Null;

/// Schema document dialect, detected per node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JsonSchema,
    Tagged,
}

/// Structural kind of one schema layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    Optional,
    Nullable,
    Default,
    Scalar,
    Unknown,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::Array => "array",
            SchemaKind::Optional => "optional",
            SchemaKind::Nullable => "nullable",
            SchemaKind::Default => "default",
            SchemaKind::Scalar => "scalar",
            SchemaKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Layers {
    optional: bool,
    default_peeled: bool,
    nullable_peeled: bool,
}

/// A borrowed view of one schema layer.
///
/// For the tagged dialect this is just the node. For JSON Schema the same
/// document may be viewed several times with successive layers peeled off.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef<'a> {
    value: &'a Value,
    layers: Layers,
}

impl<'a> SchemaRef<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            layers: Layers::default(),
        }
    }

    fn optional(value: &'a Value) -> Self {
        Self {
            value,
            layers: Layers {
                optional: true,
                ..Layers::default()
            },
        }
    }

    fn with_layers(self, layers: Layers) -> Self {
        Self {
            value: self.value,
            layers,
        }
    }

    /// The underlying document node
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Function named by the `x-sourced-from` marker on this node, if any
    pub fn sourced_from(&self) -> Option<&'a str> {
        self.value.get(SOURCED_FROM_MARKER).and_then(Value::as_str)
    }

    /// Whether this node carries the identity-context marker
    pub fn is_identity_context(&self) -> bool {
        self.value
            .get(IDENTITY_CONTEXT_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A named field of an object schema
#[derive(Debug, Clone, Copy)]
pub struct ObjectField<'a> {
    pub name: &'a str,
    pub schema: SchemaRef<'a>,
}

/// Structural description of one schema layer
#[derive(Debug, Clone)]
pub enum SchemaDescription<'a> {
    Object {
        fields: Vec<ObjectField<'a>>,
    },
    Array {
        element: SchemaRef<'a>,
    },
    Optional {
        inner: SchemaRef<'a>,
    },
    Nullable {
        inner: SchemaRef<'a>,
    },
    Default {
        inner: SchemaRef<'a>,
        value: &'a Value,
    },
    Scalar {
        type_name: &'a str,
        constraints: Vec<(&'static str, &'a Value)>,
    },
    Unknown,
}

impl SchemaDescription<'_> {
    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaDescription::Object { .. } => SchemaKind::Object,
            SchemaDescription::Array { .. } => SchemaKind::Array,
            SchemaDescription::Optional { .. } => SchemaKind::Optional,
            SchemaDescription::Nullable { .. } => SchemaKind::Nullable,
            SchemaDescription::Default { .. } => SchemaKind::Default,
            SchemaDescription::Scalar { .. } => SchemaKind::Scalar,
            SchemaDescription::Unknown => SchemaKind::Unknown,
        }
    }
}

/// Detect which dialect a node is written in, if any.
pub fn detect_dialect(value: &Value) -> Option<Dialect> {
    let obj = value.as_object()?;
    if obj.get("kind").map(Value::is_string).unwrap_or(false) {
        return Some(Dialect::Tagged);
    }
    let json_schema_keys = ["type", "properties", "items", "anyOf", "enum", "const"];
    if json_schema_keys.iter().any(|k| obj.contains_key(*k)) {
        return Some(Dialect::JsonSchema);
    }
    None
}

/// Describe the outermost layer of a schema.
pub fn describe(schema: SchemaRef<'_>) -> SchemaDescription<'_> {
    match detect_dialect(schema.value) {
        Some(Dialect::JsonSchema) => describe_json_schema(schema),
        Some(Dialect::Tagged) => describe_tagged(schema),
        None => SchemaDescription::Unknown,
    }
}

/// Convenience wrapper for describing a bare document node.
pub fn describe_value(value: &Value) -> SchemaDescription<'_> {
    describe(SchemaRef::new(value))
}

fn describe_json_schema(schema: SchemaRef<'_>) -> SchemaDescription<'_> {
    let Some(obj) = schema.value.as_object() else {
        return SchemaDescription::Unknown;
    };
    let mut layers = schema.layers;

    if layers.optional {
        layers.optional = false;
        return SchemaDescription::Optional {
            inner: schema.with_layers(layers),
        };
    }

    if !layers.default_peeled {
        if let Some(value) = obj.get("default") {
            layers.default_peeled = true;
            return SchemaDescription::Default {
                inner: schema.with_layers(layers),
                value,
            };
        }
    }

    if !layers.nullable_peeled {
        if let Some(inner) = nullable_any_of(obj) {
            return SchemaDescription::Nullable {
                inner: SchemaRef::new(inner),
            };
        }
        let flagged = obj.get("nullable").and_then(Value::as_bool).unwrap_or(false);
        if flagged || type_list_contains_null(obj) {
            layers.nullable_peeled = true;
            return SchemaDescription::Nullable {
                inner: schema.with_layers(layers),
            };
        }
    }

    match json_schema_type(obj) {
        Some("object") => {
            let required: Vec<&str> = obj
                .get("required")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let fields = match obj.get("properties") {
                None => Vec::new(),
                Some(Value::Object(props)) => props
                    .iter()
                    .map(|(name, field)| ObjectField {
                        name: name.as_str(),
                        schema: if required.contains(&name.as_str()) {
                            SchemaRef::new(field)
                        } else {
                            SchemaRef::optional(field)
                        },
                    })
                    .collect(),
                Some(_) => return SchemaDescription::Unknown,
            };
            SchemaDescription::Object { fields }
        }
        Some("array") => SchemaDescription::Array {
            element: SchemaRef::new(obj.get("items").unwrap_or(&ABSENT)),
        },
        Some(t) if SCALAR_TYPES.contains(&t) => SchemaDescription::Scalar {
            type_name: t,
            constraints: scalar_constraints(obj),
        },
        Some(_) => SchemaDescription::Unknown,
        None if obj.contains_key("enum") => SchemaDescription::Scalar {
            type_name: "enum",
            constraints: scalar_constraints(obj),
        },
        None if obj.contains_key("const") => SchemaDescription::Scalar {
            type_name: "literal",
            constraints: scalar_constraints(obj),
        },
        None => SchemaDescription::Unknown,
    }
}

/// `anyOf: [T, {type: null}]` in either order
fn nullable_any_of(obj: &Map<String, Value>) -> Option<&Value> {
    let variants = obj.get("anyOf")?.as_array()?;
    if variants.len() != 2 {
        return None;
    }
    let is_null = |v: &Value| v.get("type").and_then(Value::as_str) == Some("null");
    match (is_null(&variants[0]), is_null(&variants[1])) {
        (true, false) => Some(&variants[1]),
        (false, true) => Some(&variants[0]),
        _ => None,
    }
}

fn type_list_contains_null(obj: &Map<String, Value>) -> bool {
    obj.get("type")
        .and_then(Value::as_array)
        .map(|types| {
            types.iter().any(|t| t.as_str() == Some("null"))
                && types.iter().any(|t| t.as_str() != Some("null"))
        })
        .unwrap_or(false)
}

/// Resolve the effective `type`, ignoring `null` in a type list.
fn json_schema_type(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => {
            let non_null: Vec<&str> = types
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| *t != "null")
                .collect();
            match non_null.as_slice() {
                [] if !types.is_empty() && types.iter().all(|t| t.as_str() == Some("null")) => {
                    Some("null")
                }
                [only] => Some(*only),
                _ => Some("union"),
            }
        }
        Some(_) => Some("invalid"),
        None if obj.contains_key("properties") => Some("object"),
        None if obj.contains_key("items") => Some("array"),
        None => None,
    }
}

fn scalar_constraints(obj: &Map<String, Value>) -> Vec<(&'static str, &Value)> {
    SCALAR_CONSTRAINT_KEYS
        .iter()
        .filter_map(|key| obj.get(*key).map(|v| (*key, v)))
        .collect()
}

fn describe_tagged(schema: SchemaRef<'_>) -> SchemaDescription<'_> {
    let Some(obj) = schema.value.as_object() else {
        return SchemaDescription::Unknown;
    };
    let kind = obj.get("kind").and_then(Value::as_str).unwrap_or_default();
    let child = |key: &str| SchemaRef::new(obj.get(key).unwrap_or(&ABSENT));

    match kind {
        "object" => match obj.get("shape") {
            None => SchemaDescription::Object { fields: Vec::new() },
            Some(Value::Object(shape)) => SchemaDescription::Object {
                fields: shape
                    .iter()
                    .map(|(name, field)| ObjectField {
                        name: name.as_str(),
                        schema: SchemaRef::new(field),
                    })
                    .collect(),
            },
            Some(_) => SchemaDescription::Unknown,
        },
        "array" => SchemaDescription::Array {
            element: child("element"),
        },
        "optional" => SchemaDescription::Optional {
            inner: child("inner"),
        },
        "nullable" => SchemaDescription::Nullable {
            inner: child("inner"),
        },
        "default" => SchemaDescription::Default {
            inner: child("inner"),
            value: obj.get("value").unwrap_or(&ABSENT),
        },
        k if TAGGED_SCALAR_KINDS.contains(&k) => {
            let mut constraints = scalar_constraints(obj);
            match k {
                "enum" => {
                    if let Some(values) = obj.get("values") {
                        constraints.push(("enum", values));
                    }
                }
                "literal" => {
                    if let Some(value) = obj.get("value") {
                        constraints.push(("const", value));
                    }
                }
                _ => {}
            }
            constraints.sort_by_key(|(key, _)| *key);
            constraints.dedup_by_key(|(key, _)| *key);
            SchemaDescription::Scalar {
                type_name: k,
                constraints,
            }
        }
        _ => SchemaDescription::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_dialect() {
        assert_eq!(
            detect_dialect(&json!({"type": "string"})),
            Some(Dialect::JsonSchema)
        );
        assert_eq!(
            detect_dialect(&json!({"kind": "string"})),
            Some(Dialect::Tagged)
        );
        assert_eq!(detect_dialect(&json!({"shape": {}})), None);
        assert_eq!(detect_dialect(&json!("string")), None);
    }

    #[test]
    fn test_json_schema_object_marks_unrequired_fields_optional() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "string"}, "note": {"type": "string"}},
            "required": ["id"]
        });
        let SchemaDescription::Object { fields } = describe_value(&schema) else {
            panic!("expected object");
        };
        let kinds: Vec<(&str, SchemaKind)> = fields
            .iter()
            .map(|f| (f.name, describe(f.schema).kind()))
            .collect();
        assert!(kinds.contains(&("id", SchemaKind::Scalar)));
        assert!(kinds.contains(&("note", SchemaKind::Optional)));
    }

    #[test]
    fn test_json_schema_layers_peel_in_order() {
        let schema = json!({"type": ["string", "null"], "default": "x"});
        let first = describe_value(&schema);
        assert_eq!(first.kind(), SchemaKind::Default);
        let SchemaDescription::Default { inner, value } = first else {
            unreachable!()
        };
        assert_eq!(value, &json!("x"));
        let second = describe(inner);
        assert_eq!(second.kind(), SchemaKind::Nullable);
        let SchemaDescription::Nullable { inner } = second else {
            unreachable!()
        };
        assert!(matches!(
            describe(inner),
            SchemaDescription::Scalar { type_name: "string", .. }
        ));
    }

    #[test]
    fn test_any_of_null_is_nullable() {
        let schema = json!({"anyOf": [{"type": "null"}, {"type": "integer"}]});
        let SchemaDescription::Nullable { inner } = describe_value(&schema) else {
            panic!("expected nullable");
        };
        assert!(matches!(
            describe(inner),
            SchemaDescription::Scalar { type_name: "integer", .. }
        ));
    }

    #[test]
    fn test_null_only_type_list_is_null_scalar() {
        for schema in [json!({"type": ["null"]}), json!({"type": ["null", "null"]})] {
            assert!(matches!(
                describe_value(&schema),
                SchemaDescription::Scalar { type_name: "null", .. }
            ));
        }
        assert_eq!(
            describe_value(&json!({"type": []})).kind(),
            SchemaKind::Unknown
        );
    }

    #[test]
    fn test_tagged_wrappers() {
        let schema = json!({
            "kind": "optional",
            "inner": {"kind": "array", "element": {"kind": "enum", "values": ["a", "b"]}}
        });
        let SchemaDescription::Optional { inner } = describe_value(&schema) else {
            panic!("expected optional");
        };
        let SchemaDescription::Array { element } = describe(inner) else {
            panic!("expected array");
        };
        let SchemaDescription::Scalar {
            type_name,
            constraints,
        } = describe(element)
        else {
            panic!("expected scalar");
        };
        assert_eq!(type_name, "enum");
        assert_eq!(constraints, vec![("enum", &json!(["a", "b"]))]);
    }

    #[test]
    fn test_unrecognised_shapes_are_unknown() {
        for schema in [
            json!(null),
            json!(42),
            json!({"kind": "promise"}),
            json!({"type": "function"}),
            json!({"type": ["string", "integer"]}),
            json!({"type": "object", "properties": ["not", "a", "map"]}),
        ] {
            assert_eq!(describe_value(&schema).kind(), SchemaKind::Unknown);
        }
    }

    #[test]
    fn test_array_without_items_has_unknown_element() {
        let schema = json!({"type": "array"});
        let SchemaDescription::Array { element } = describe_value(&schema) else {
            panic!("expected array");
        };
        assert_eq!(describe(element).kind(), SchemaKind::Unknown);
    }

    #[test]
    fn test_markers_are_read_from_node() {
        let schema = json!({"type": "string", "x-sourced-from": "listUsers", "x-identity-context": true});
        let node = SchemaRef::new(&schema);
        assert_eq!(node.sourced_from(), Some("listUsers"));
        assert!(node.is_identity_context());
    }
}
