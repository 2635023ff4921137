//! Error types shared by every desk module.

use thiserror::Error;

/// Desk error types
#[derive(Debug, Error)]
pub enum DeskError {
    /// A non-admin attempted an admin-only action
    #[error("Permission denied: only an administrator may {action}")]
    PermissionDenied { action: String },

    /// Required input was blank or out of range; nothing was written
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Date or month could not be parsed
    #[error("Invalid date '{0}'. Use YYYY-MM-DD (or YYYY-MM for months).")]
    InvalidDate(String),

    /// IO error while reading or writing the data file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data file could not be (de)serialized
    #[error("Data file error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeskError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DeskError::NotFound { kind, id: id.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DeskError::ValidationFailed(msg.into())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DeskError::PermissionDenied { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DeskError::ValidationFailed(_))
    }
}

/// Result type for desk operations
pub type DeskResult<T> = Result<T, DeskError>;
