//! Diff output types.
//!
//! Serialized with camelCase keys for `--json` output. Absent sub-fields of a
//! [`ChangeRecord`] are omitted entirely so a renderer can show a minimal diff.

use crate::snapshot::model::ApiSurfaceSnapshot;
use serde::{Deserialize, Serialize};

/// How a function changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// Per-function change record.
///
/// For `added`/`removed` records the side that exists carries its access,
/// description and entities. For `modified` records only differing
/// sub-fields are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub name: String,
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_access: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_access: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_entities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_entities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_references_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_context_changed: Option<bool>,
}

impl ChangeRecord {
    /// A record with every sub-field absent
    pub fn new(name: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            old_access: None,
            new_access: None,
            old_description: None,
            new_description: None,
            old_entities: None,
            new_entities: None,
            inputs_changed: None,
            outputs_changed: None,
            field_references_changed: None,
            identity_context_changed: None,
        }
    }

    /// Names of the populated sub-fields, in a fixed order
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.old_access.is_some() || self.new_access.is_some() {
            fields.push("access");
        }
        if self.old_description.is_some() || self.new_description.is_some() {
            fields.push("description");
        }
        if self.old_entities.is_some() || self.new_entities.is_some() {
            fields.push("entities");
        }
        if self.inputs_changed == Some(true) {
            fields.push("inputs");
        }
        if self.outputs_changed == Some(true) {
            fields.push("outputs");
        }
        if self.field_references_changed == Some(true) {
            fields.push("fieldReferences");
        }
        if self.identity_context_changed == Some(true) {
            fields.push("identityContext");
        }
        fields
    }
}

/// Categorized result of comparing two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    pub has_changes: bool,
    /// Previous API name, present only when the name changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,
    pub added_groups: Vec<String>,
    pub removed_groups: Vec<String>,
    pub added_entities: Vec<String>,
    pub removed_entities: Vec<String>,
    pub functions: Vec<ChangeRecord>,
    /// The live snapshot, committed as-is on approval
    pub new_snapshot: ApiSurfaceSnapshot,
    /// Hash of `new_snapshot`
    pub new_hash: String,
}

impl Changeset {
    /// Look up the change record for a function
    pub fn function(&self, name: &str) -> Option<&ChangeRecord> {
        self.functions.iter().find(|r| r.name == name)
    }

    /// `(old, new)` API names if the definition was renamed
    pub fn rename(&self) -> Option<(&str, &str)> {
        self.old_name
            .as_deref()
            .map(|old| (old, self.new_snapshot.name.as_str()))
    }

    /// Total number of reported changes across all categories
    pub fn change_count(&self) -> usize {
        usize::from(self.old_name.is_some())
            + self.added_groups.len()
            + self.removed_groups.len()
            + self.added_entities.len()
            + self.removed_entities.len()
            + self.functions.len()
    }
}
