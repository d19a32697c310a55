use ontolock_core::definition::{ApiDefinition, DefinitionBuilder, FunctionDef};
use ontolock_core::gate::Mode;
use ontolock_core::logging_facility::Profile;
use ontolock_engine::config::GateConfig;
use serde_json::json;
use std::path::Path;

#[allow(dead_code)]
pub fn users_definition() -> ApiDefinition {
    DefinitionBuilder::new("users")
        .access_group("admin", "Administrators")
        .access_group("public", "Anonymous callers")
        .entity("User", "")
        .function(
            "getUser",
            FunctionDef::new(
                "Fetch a user",
                json!({
                    "type": "object",
                    "properties": {"id": {"type": "string"}},
                    "required": ["id"]
                }),
            )
            .access(["admin"])
            .entities(["User"]),
        )
        .build()
        .unwrap()
}

/// `users_definition` with `getUser` also callable by `support`
#[allow(dead_code)]
pub fn widened_definition() -> ApiDefinition {
    let mut def = users_definition();
    def.access_groups
        .insert("support".to_string(), Default::default());
    def.functions.get_mut("getUser").unwrap().access =
        vec!["admin".to_string(), "support".to_string()];
    def.validate().unwrap();
    def
}

#[allow(dead_code)]
pub fn config(dir: &Path, mode: Mode) -> GateConfig {
    GateConfig {
        mode,
        lock_dir: dir.to_path_buf(),
        auto_approve: false,
        log_profile: Profile::Test,
    }
}
