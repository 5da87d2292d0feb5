use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Required field '{field}' is empty")]
    MissingField { field: &'static str },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Sheet is missing column '{column}'")]
    MissingColumn { column: String },

    #[error("Invalid column mapping: {reason}")]
    InvalidMapping { reason: String },

    #[error("Writing the sheet failed: {reason}")]
    WriteFailed { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used by front ends to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input. Nothing was written.
    Validation,
    /// The store could not be read or written. Safe to try again.
    Persistence,
    /// The sheet layout or column mapping does not match.
    Schema,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::MissingField { .. } | CheckError::InvalidField { .. } => {
                ErrorKind::Validation
            }
            CheckError::MissingColumn { .. } | CheckError::InvalidMapping { .. } => {
                ErrorKind::Schema
            }
            CheckError::Database(_)
            | CheckError::Serialization(_)
            | CheckError::WriteFailed { .. }
            | CheckError::Other(_) => ErrorKind::Persistence,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Persistence
    }
}

pub type CheckResult<T> = Result<T, CheckError>;
