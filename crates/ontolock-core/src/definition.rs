//! Live API definition model and structural validation.
//!
//! An [`ApiDefinition`] is the full, live description of the function-based
//! API: access groups, entities, functions with their input/output schemas,
//! handler references and the authentication contract. Only part of it is
//! security relevant; the extractor projects that part into a snapshot.
//!
//! Definitions are validated eagerly. [`DefinitionBuilder::build`] and the
//! engine's loader both call [`ApiDefinition::validate`] before any snapshot
//! or hash work happens.

use crate::errors::DefinitionError;
use crate::schema::{canonicalize_schema, marked_fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque reference to handler code (a module path, file path, symbol...).
///
/// The change-control core only records that a reference exists; resolving
/// it is the job of a handler loader injected by whatever serves requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named permission bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGroupDef {
    #[serde(default)]
    pub description: String,
}

/// A domain-object tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDef {
    #[serde(default)]
    pub description: String,
}

/// Authentication contract; its implementation is never part of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDef {
    pub handler: HandlerRef,
}

/// One callable function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDef {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub access: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    pub inputs: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<HandlerRef>,
}

impl FunctionDef {
    pub fn new(description: impl Into<String>, inputs: Value) -> Self {
        Self {
            description: description.into(),
            access: Vec::new(),
            entities: Vec::new(),
            inputs,
            outputs: None,
            handler: None,
        }
    }

    pub fn access<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    pub fn outputs(mut self, outputs: Value) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }
}

/// The full live API definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    pub name: String,
    #[serde(default)]
    pub access_groups: BTreeMap<String, AccessGroupDef>,
    #[serde(default)]
    pub entities: BTreeMap<String, EntityDef>,
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthDef>,
}

impl ApiDefinition {
    /// Check the definition for structural problems.
    ///
    /// Functions are checked in name order so the first reported error is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        for (name, function) in &self.functions {
            if function.access.is_empty() {
                return Err(DefinitionError::NoAccessGroups {
                    function: name.clone(),
                });
            }
            if let Some(group) = function
                .access
                .iter()
                .find(|g| !self.access_groups.contains_key(*g))
            {
                return Err(DefinitionError::UnknownAccessGroup {
                    function: name.clone(),
                    group: group.clone(),
                });
            }
            if let Some(entity) = function
                .entities
                .iter()
                .find(|e| !self.entities.contains_key(*e))
            {
                return Err(DefinitionError::UnknownEntity {
                    function: name.clone(),
                    entity: entity.clone(),
                });
            }

            let inputs = canonicalize_schema(&function.inputs);
            for field in marked_fields(&inputs.tree) {
                if field.identity_context && field.sourced_from.is_some() {
                    return Err(DefinitionError::ConflictingFieldMarkers {
                        function: name.clone(),
                        path: field.path,
                    });
                }
                if let Some(target) = field.sourced_from {
                    if !self.functions.contains_key(&target) {
                        return Err(DefinitionError::DanglingFieldReference {
                            function: name.clone(),
                            path: field.path,
                            target,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Builds an [`ApiDefinition`] and validates it in one step.
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    definition: ApiDefinition,
}

impl DefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            definition: ApiDefinition {
                name: name.into(),
                ..ApiDefinition::default()
            },
        }
    }

    pub fn access_group(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.definition.access_groups.insert(
            name.into(),
            AccessGroupDef {
                description: description.into(),
            },
        );
        self
    }

    pub fn entity(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.definition.entities.insert(
            name.into(),
            EntityDef {
                description: description.into(),
            },
        );
        self
    }

    pub fn function(mut self, name: impl Into<String>, function: FunctionDef) -> Self {
        self.definition.functions.insert(name.into(), function);
        self
    }

    pub fn auth(mut self, handler: HandlerRef) -> Self {
        self.definition.auth = Some(AuthDef { handler });
        self
    }

    /// Finish the definition.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if the definition is structurally invalid.
    pub fn build(self) -> Result<ApiDefinition, DefinitionError> {
        self.definition.validate()?;
        Ok(self.definition)
    }
}
