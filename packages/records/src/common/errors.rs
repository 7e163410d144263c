use thiserror::Error;

use super::RecordId;

/// Result type for record mutations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors surfaced by the record mutation engine.
///
/// Input errors are raised before any casting or I/O. Malformed field values
/// are never errors; they cast to "absent".
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid record type: {0:?}")]
    InvalidType(String),

    #[error("Invalid record id: {0:?}")]
    InvalidId(String),

    #[error("Invalid actor id: {0:?}")]
    InvalidActor(String),

    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: RecordId },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl RecordError {
    /// Stable machine-readable code for API layers.
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::InvalidType(_) => "INVALID_TYPE",
            RecordError::InvalidId(_) => "INVALID_ID",
            RecordError::InvalidActor(_) => "INVALID_ACTOR",
            RecordError::NotFound { .. } => "NOT_FOUND",
            RecordError::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether the error was caused by caller input rather than the store.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RecordError::InvalidType(_) | RecordError::InvalidId(_) | RecordError::InvalidActor(_)
        )
    }
}
