//! Structural validation of live definitions, including field references.

mod common;

use common::{object_schema, users_definition};
use ontolock_core::definition::{ApiDefinition, DefinitionBuilder, FunctionDef};
use ontolock_core::errors::{DefinitionError, ExError, ExErrorKind};
use ontolock_core::snapshot::{collect_identity_fields, extract_snapshot, FieldReference};
use serde_json::json;

fn with_assign(inputs: serde_json::Value) -> Result<ApiDefinition, DefinitionError> {
    DefinitionBuilder::new("tickets")
        .access_group("agent", "")
        .entity("Ticket", "")
        .function(
            "listAgents",
            FunctionDef::new("", object_schema(json!({}))).access(["agent"]),
        )
        .function(
            "assignTicket",
            FunctionDef::new("", inputs)
                .access(["agent"])
                .entities(["Ticket"]),
        )
        .build()
}

#[test]
fn test_nested_field_reference_is_recorded_with_path() {
    let def = with_assign(object_schema(json!({
        "assignment": object_schema(json!({
            "agentId": {"type": "string", "x-sourced-from": "listAgents"}
        })),
        "watchers": {
            "type": "array",
            "items": object_schema(json!({
                "agentId": {"type": "string", "x-sourced-from": "listAgents"}
            }))
        }
    })))
    .unwrap();

    let snapshot = extract_snapshot(&def);
    let refs = &snapshot.function("assignTicket").unwrap().field_references;
    assert_eq!(
        refs,
        &vec![
            FieldReference {
                path: "assignment.agentId".to_string(),
                function_name: "listAgents".to_string(),
            },
            FieldReference {
                path: "watchers[].agentId".to_string(),
                function_name: "listAgents".to_string(),
            },
        ]
    );
}

#[test]
fn test_reference_to_missing_function_is_rejected() {
    let err = with_assign(object_schema(json!({
        "agentId": {"type": "string", "x-sourced-from": "listStaff"}
    })))
    .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DanglingFieldReference {
            function: "assignTicket".to_string(),
            path: "agentId".to_string(),
            target: "listStaff".to_string(),
        }
    );

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::DefinitionInvalid);
    assert_eq!(ex.code(), "ERR_DEFINITION_INVALID");
}

#[test]
fn test_optional_reference_keeps_marker() {
    let def = with_assign(json!({
        "type": "object",
        "properties": {
            "agentId": {"type": "string", "x-sourced-from": "listAgents"}
        }
    }))
    .unwrap();
    let snapshot = extract_snapshot(&def);
    let assign = snapshot.function("assignTicket").unwrap();
    assert_eq!(assign.field_references.len(), 1);
    assert_eq!(
        assign.inputs_schema["properties"]["agentId"],
        json!({
            "type": "optional",
            "inner": {"type": "string"},
            "sourcedFrom": "listAgents"
        })
    );
}

#[test]
fn test_identity_fields_are_collected_per_function() {
    let def = with_assign(object_schema(json!({
        "ticketId": {"type": "string"},
        "actorId": {"type": "string", "x-identity-context": true}
    })))
    .unwrap();
    let fields = collect_identity_fields(&def);
    assert_eq!(fields.get("assignTicket"), Some(&vec!["actorId".to_string()]));
    assert!(!fields.contains_key("listAgents"));
    assert!(
        extract_snapshot(&def)
            .function("assignTicket")
            .unwrap()
            .uses_identity_context
    );
}

#[test]
fn test_loaded_definition_with_unknown_group_fails_validation() {
    let mut def = users_definition();
    def.functions.get_mut("getUser").unwrap().access = vec!["root".to_string()];
    let err = def.validate().unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::UnknownAccessGroup { ref group, .. } if group == "root"
    ));
}

#[test]
fn test_dangling_reference_on_unconvertible_field_rejected() {
    let err = with_assign(object_schema(json!({
        "agentId": {"type": ["string", "integer"], "x-sourced-from": "ghostFunction"}
    })))
    .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DanglingFieldReference {
            function: "assignTicket".to_string(),
            path: "agentId".to_string(),
            target: "ghostFunction".to_string(),
        }
    );
}

#[test]
fn test_markers_on_unconvertible_fields_still_reach_snapshot() {
    let def = with_assign(object_schema(json!({
        "agentIds": {
            "type": "array",
            "items": {"kind": "promise", "x-sourced-from": "listAgents"}
        },
        "actorId": {"type": ["string", "integer"], "x-identity-context": true}
    })))
    .unwrap();

    let snapshot = extract_snapshot(&def);
    let assign = snapshot.function("assignTicket").unwrap();
    assert_eq!(
        assign.field_references,
        vec![FieldReference {
            path: "agentIds[]".to_string(),
            function_name: "listAgents".to_string(),
        }]
    );
    assert!(assign.uses_identity_context);
    assert_eq!(collect_identity_fields(&def)["assignTicket"], vec!["actorId"]);
}

#[test]
fn test_conflicting_markers_on_unconvertible_field_rejected() {
    let err = with_assign(object_schema(json!({
        "agentId": {
            "kind": "promise",
            "x-sourced-from": "listAgents",
            "x-identity-context": true
        }
    })))
    .unwrap_err();
    assert!(matches!(
        err,
        DefinitionError::ConflictingFieldMarkers { ref path, .. } if path == "agentId"
    ));
}
