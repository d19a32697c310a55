//! Snapshot schema.
//!
//! Serialized with camelCase keys; this is the `ontology` object of the
//! persisted lock record. Every list is sorted by the extractor.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One function input field drawing its option set from another function
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    /// Field path: `.` for object nesting, `[]` for array elements
    pub path: String,
    /// Function the field is sourced from
    pub function_name: String,
}

/// Security-relevant shape of one function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionShape {
    pub description: String,
    /// Access groups allowed to call the function (sorted)
    pub access: Vec<String>,
    /// Entities the function touches (sorted)
    pub entities: Vec<String>,
    /// Canonical input schema tree
    pub inputs_schema: Value,
    /// Canonical output schema tree, if the function declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_schema: Option<Value>,
    /// Sorted by (path, function name)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_references: Vec<FieldReference>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uses_identity_context: bool,
}

/// The canonical, security-relevant projection of an API definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSurfaceSnapshot {
    pub name: String,
    /// Declared access group names (sorted)
    pub access_groups: Vec<String>,
    /// Declared entity names (sorted)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<String>,
    pub functions: BTreeMap<String, FunctionShape>,
}

impl ApiSurfaceSnapshot {
    pub fn function(&self, name: &str) -> Option<&FunctionShape> {
        self.functions.get(name)
    }
}
