use crate::diff::model::Changeset;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by ontolock is classified by one of these kinds.
/// Each kind maps to a stable error code that tests, log pipelines and the
/// CLI can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Definition
    /// The live API definition is structurally invalid (always fatal)
    DefinitionInvalid,
    /// A single schema could not be converted to canonical form
    SchemaConversion,

    // Lock record
    /// The stored lock record is corrupt or has an unsupported version
    LockParse,
    /// The live surface hash differs from the approved one
    LockMismatch,
    /// No approved lock record exists yet
    MissingLock,
    /// Another writer replaced the lock record between read and write
    Concurrency,

    // Review
    /// The reviewer declined the pending changeset
    ReviewRejected,
    /// No review workflow is configured for an interactive decision
    ReviewUnavailable,

    // Configuration / input
    InvalidConfig,
    InvalidInput,
    NotFound,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DefinitionInvalid => "ERR_DEFINITION_INVALID",
            ExErrorKind::SchemaConversion => "ERR_SCHEMA_CONVERSION",
            ExErrorKind::LockParse => "ERR_LOCK_PARSE",
            ExErrorKind::LockMismatch => "ERR_LOCK_MISMATCH",
            ExErrorKind::MissingLock => "ERR_MISSING_LOCK",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::ReviewRejected => "ERR_REVIEW_REJECTED",
            ExErrorKind::ReviewUnavailable => "ERR_REVIEW_UNAVAILABLE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the severity of this kind depends on the operating mode.
    ///
    /// Only an unapproved surface (mismatch or missing lock) may be downgraded
    /// to a warning in development. Everything else means the input itself
    /// cannot be trusted and aborts regardless of mode.
    pub fn is_mode_dependent(&self) -> bool {
        matches!(self, ExErrorKind::LockMismatch | ExErrorKind::MissingLock)
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context. Gate failures attach the
/// full [`Changeset`] so the caller can always print the categorized diff
/// instead of a bare "changed".
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    function: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    changeset: Option<Box<Changeset>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            function: None,
            path: None,
            message: String::new(),
            source: None,
            changeset: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add function name context
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Add field path or file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the changeset that explains a gate failure
    pub fn with_changeset(mut self, changeset: Changeset) -> Self {
        self.changeset = Some(Box::new(changeset));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the function name context, if any
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the attached changeset, if any
    pub fn changeset(&self) -> Option<&Changeset> {
        self.changeset.as_deref()
    }

    /// See [`ExErrorKind::is_mode_dependent`]
    pub fn is_mode_dependent(&self) -> bool {
        self.kind.is_mode_dependent()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(function) = &self.function {
            write!(f, " (function: {})", function)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Structural problems in the live API definition.
///
/// Detected eagerly when a definition is built or loaded, before any
/// snapshot or hash work happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The definition has no name
    #[error("Definition name must not be empty")]
    EmptyName,

    /// A function grants access to a group that is not declared
    #[error("Function {function} references unknown access group: {group}")]
    UnknownAccessGroup { function: String, group: String },

    /// A function tags an entity that is not declared
    #[error("Function {function} references unknown entity: {entity}")]
    UnknownEntity { function: String, entity: String },

    /// A function that no access group may call
    #[error("Function {function} does not grant access to any group")]
    NoAccessGroups { function: String },

    /// An input field is sourced from a function that does not exist
    #[error("Function {function} field {path} is sourced from unknown function: {target}")]
    DanglingFieldReference {
        function: String,
        path: String,
        target: String,
    },

    /// A field is marked both as caller-supplied reference and identity-injected
    #[error("Function {function} field {path} is both sourced from a function and identity-injected")]
    ConflictingFieldMarkers { function: String, path: String },
}

impl DefinitionError {
    fn function(&self) -> Option<&str> {
        match self {
            DefinitionError::EmptyName => None,
            DefinitionError::UnknownAccessGroup { function, .. }
            | DefinitionError::UnknownEntity { function, .. }
            | DefinitionError::NoAccessGroups { function }
            | DefinitionError::DanglingFieldReference { function, .. }
            | DefinitionError::ConflictingFieldMarkers { function, .. } => Some(function),
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            DefinitionError::DanglingFieldReference { path, .. }
            | DefinitionError::ConflictingFieldMarkers { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<DefinitionError> for ExError {
    fn from(err: DefinitionError) -> Self {
        let mut ex = ExError::new(ExErrorKind::DefinitionInvalid)
            .with_op("validate_definition")
            .with_message(err.to_string());
        if let Some(function) = err.function() {
            ex = ex.with_function(function);
        }
        if let Some(path) = err.path() {
            ex = ex.with_path(path);
        }
        ex
    }
}

/// A schema that could not be converted to its canonical tree.
///
/// Recovered locally by the extractor: the offending field becomes an
/// `unknown` placeholder and extraction continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaConversionError {
    /// The introspector did not recognise the schema shape
    #[error("Unrecognised schema shape at {path}")]
    Unrecognised { path: String },

    /// Nesting exceeded the conversion depth limit
    #[error("Schema nesting exceeds depth {limit} at {path}")]
    TooDeep { path: String, limit: usize },
}

impl From<SchemaConversionError> for ExError {
    fn from(err: SchemaConversionError) -> Self {
        let path = match &err {
            SchemaConversionError::Unrecognised { path }
            | SchemaConversionError::TooDeep { path, .. } => path.clone(),
        };
        ExError::new(ExErrorKind::SchemaConversion)
            .with_op("canonicalize_schema")
            .with_path(path)
            .with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ExErrorKind::DefinitionInvalid.code(),
            "ERR_DEFINITION_INVALID"
        );
        assert_eq!(ExErrorKind::LockParse.code(), "ERR_LOCK_PARSE");
        assert_eq!(ExErrorKind::LockMismatch.code(), "ERR_LOCK_MISMATCH");
        assert_eq!(ExErrorKind::MissingLock.code(), "ERR_MISSING_LOCK");
    }

    #[test]
    fn test_only_unapproved_surface_is_mode_dependent() {
        assert!(ExErrorKind::LockMismatch.is_mode_dependent());
        assert!(ExErrorKind::MissingLock.is_mode_dependent());
        assert!(!ExErrorKind::LockParse.is_mode_dependent());
        assert!(!ExErrorKind::DefinitionInvalid.is_mode_dependent());
    }

    #[test]
    fn test_definition_error_carries_context() {
        let err: ExError = DefinitionError::DanglingFieldReference {
            function: "assignTicket".to_string(),
            path: "assigneeId".to_string(),
            target: "listAgents".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::DefinitionInvalid);
        assert_eq!(err.function(), Some("assignTicket"));
        assert_eq!(err.path(), Some("assigneeId"));
        assert!(err.to_string().contains("listAgents"));
    }

    #[test]
    fn test_display_includes_op_and_message() {
        let err = ExError::new(ExErrorKind::Io)
            .with_op("read_lock")
            .with_message("permission denied");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_IO]"));
        assert!(rendered.contains("read_lock"));
        assert!(rendered.contains("permission denied"));
    }
}
