use ontolock_core::definition::{ApiDefinition, DefinitionBuilder, FunctionDef, HandlerRef};
use ontolock_core::snapshot::ApiSurfaceSnapshot;
use serde_json::{json, Value};

/// Object schema in JSON Schema form with every field required
#[allow(dead_code)]
pub fn object_schema(properties: Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|p| p.keys().cloned().collect())
        .unwrap_or_default();
    json!({"type": "object", "properties": properties, "required": required})
}

/// Users API: groups admin/public, one function `getUser` callable by admin
#[allow(dead_code)]
pub fn users_definition() -> ApiDefinition {
    DefinitionBuilder::new("users")
        .access_group("admin", "Administrators")
        .access_group("public", "Anonymous callers")
        .entity("User", "Account holder")
        .function(
            "getUser",
            FunctionDef::new(
                "Fetch a user",
                object_schema(json!({"id": {"type": "string", "format": "uuid"}})),
            )
            .access(["admin"])
            .entities(["User"])
            .outputs(object_schema(json!({"email": {"type": "string"}})))
            .handler(HandlerRef::new("handlers/users.rs#get")),
        )
        .build()
        .unwrap()
}

/// Add a function callable by `admin` that takes no inputs
#[allow(dead_code)]
pub fn with_function(mut def: ApiDefinition, name: &str) -> ApiDefinition {
    def.functions.insert(
        name.to_string(),
        FunctionDef::new(format!("{} function", name), object_schema(json!({})))
            .access(["admin"]),
    );
    def.validate().unwrap();
    def
}

#[allow(dead_code)]
pub fn snapshot_of(def: &ApiDefinition) -> ApiSurfaceSnapshot {
    ontolock_core::snapshot::extract_snapshot(def)
}
