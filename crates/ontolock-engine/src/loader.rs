//! Loading live API definitions from disk.
//!
//! YAML (`.yaml`, `.yml`) and JSON (`.json`) are accepted; the format is
//! chosen by extension. Every loaded definition is validated before it is
//! returned.

#![allow(clippy::result_large_err)]

use ontolock_core::definition::ApiDefinition;
use ontolock_core::errors::{ExError, ExErrorKind};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl DefinitionFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Some(DefinitionFormat::Json),
            Some("yaml") | Some("yml") => Some(DefinitionFormat::Yaml),
            _ => None,
        }
    }
}

/// Parse and validate a definition from text.
///
/// # Errors
///
/// - `InvalidInput`: the text is not a well-formed definition document
/// - `DefinitionInvalid`: the definition fails structural validation
pub fn parse_definition(text: &str, format: DefinitionFormat) -> Result<ApiDefinition, ExError> {
    let definition: ApiDefinition = match format {
        DefinitionFormat::Json => serde_json::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_definition")
                .with_message(format!("invalid JSON definition: {}", e))
        })?,
        DefinitionFormat::Yaml => serde_yaml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_definition")
                .with_message(format!("invalid YAML definition: {}", e))
        })?,
    };
    definition.validate()?;
    Ok(definition)
}

/// Read, parse and validate the definition at `path`.
///
/// # Errors
///
/// - `NotFound`: no file at `path`
/// - `InvalidInput`: unsupported extension or malformed document
/// - `DefinitionInvalid`: the definition fails structural validation
/// - `Io`: the file cannot be read
pub fn load_definition(path: &Path) -> Result<ApiDefinition, ExError> {
    let display = path.display().to_string();
    let format = DefinitionFormat::from_path(path).ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("load_definition")
            .with_path(display.clone())
            .with_message("definition file must end in .json, .yaml or .yml")
    })?;

    let text = std::fs::read_to_string(path).map_err(|e| {
        let kind = if e.kind() == std::io::ErrorKind::NotFound {
            ExErrorKind::NotFound
        } else {
            ExErrorKind::Io
        };
        ExError::new(kind)
            .with_op("load_definition")
            .with_path(display.clone())
            .with_message(e.to_string())
    })?;

    // Field-level errors already carry a field path; keep it.
    parse_definition(&text, format).map_err(|e| {
        if e.path().is_some() {
            e
        } else {
            e.with_path(display)
        }
    })
}
