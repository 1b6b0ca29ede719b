use thiserror::Error;

/// Error type for hetgraph operations.
#[derive(Debug, Error)]
pub enum HetGraphError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("schema reset failed: {0}")]
    SchemaResetFailed(String),
    /// A load batch failed to commit. Batches `0..batch_index` committed and
    /// remain in the store; the caller re-runs `rebuild` to reach a
    /// consistent snapshot.
    #[error("partial load failure at batch {batch_index}: {reason}")]
    PartialLoadFailure { batch_index: usize, reason: String },
    #[error("malformed row: {0}")]
    MalformedRow(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HetGraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        HetGraphError::ConnectionError(msg.into())
    }

    pub fn schema_reset<T: Into<String>>(msg: T) -> Self {
        HetGraphError::SchemaResetFailed(msg.into())
    }

    pub fn partial_load<T: Into<String>>(batch_index: usize, reason: T) -> Self {
        HetGraphError::PartialLoadFailure {
            batch_index,
            reason: reason.into(),
        }
    }

    pub fn malformed_row<T: Into<String>>(msg: T) -> Self {
        HetGraphError::MalformedRow(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        HetGraphError::QueryError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        HetGraphError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        HetGraphError::InvalidInput(msg.into())
    }
}
