//! Error types for query compilation and execution.

/// Opaque error raised by a storage executor.
///
/// Passed through unmodified; callers can downcast to the adapter's
/// concrete error type (e.g. `rusqlite::Error`).
pub type StorageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while compiling or running a query.
///
/// Every variant is fatal for the invocation: there are no partial results.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Malformed specification text or structure.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown entity: '{0}'")]
    UnknownEntity(String),

    /// A non-terminal path segment is not a relationship of the entity
    /// reached so far.
    #[error("Unknown relationship '{relationship}' on entity '{entity}' in path '{path}'")]
    UnknownRelationship {
        path: String,
        entity: String,
        relationship: String,
    },

    /// The terminal path segment is not a field of the final entity.
    #[error("Unknown field '{field}' on entity '{entity}' in path '{path}'")]
    UnknownField {
        path: String,
        entity: String,
        field: String,
    },

    #[error("No fields requested. A query needs at least one field.")]
    EmptyFieldList,

    #[error("Unsupported operator '{operator}' in filter on '{path}'")]
    UnsupportedOperator { path: String, operator: String },

    #[error("Operator '{operator}' on '{path}' expects {expected}, got {found}")]
    OperandTypeMismatch {
        path: String,
        operator: String,
        expected: String,
        found: String,
    },

    /// The executor returned a row whose width doesn't match the selection.
    #[error("Storage returned a row with {found} values, expected {expected}")]
    RowShapeMismatch { expected: usize, found: usize },

    #[error("{0}")]
    Storage(#[source] StorageError),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl From<serde_yaml::Error> for QueryError {
    fn from(err: serde_yaml::Error) -> Self {
        QueryError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Parse(err.to_string())
    }
}
