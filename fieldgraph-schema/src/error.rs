//! Error types for schema construction and value translation.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Errors raised while building the schema or resolving field values.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid result of the {hook} hook: expected {expected}, got {actual}")]
    InvalidOverrideResult {
        hook: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("raw field value has no '{attribute}' attribute")]
    MissingRawAttribute { attribute: String },

    #[error("failed to register type '{type_name}': {source}")]
    TypeRegistrationFailed {
        type_name: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to register field '{field}' on '{owner}': {source}")]
    FieldRegistrationFailed {
        owner: String,
        field: String,
        #[source]
        source: RegistryError,
    },

    #[error("failed to expose content type '{name}': {source}")]
    ContentTypeRegistrationFailed {
        name: String,
        #[source]
        source: RegistryError,
    },

    #[error("malformed raw value: {0}")]
    MalformedRawValue(String),

    #[error("unknown composite type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("GraphQL schema rejected: {0}")]
    SchemaBuild(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by a [`SchemaRegistry`](crate::SchemaRegistry) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type already registered: {0}")]
    DuplicateType(String),

    #[error("owner type not registered: {0}")]
    UnknownOwner(String),

    #[error("field '{field}' already registered on '{owner}'")]
    DuplicateField { owner: String, field: String },

    #[error("field '{field}' not registered on '{owner}'")]
    UnknownField { owner: String, field: String },

    #[error("rejected: {0}")]
    Rejected(String),
}
