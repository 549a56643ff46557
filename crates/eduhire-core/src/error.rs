use thiserror::Error;

/// Shared error taxonomy. Subsystem crates keep their own error enums and
/// convert into this one at the boundary, so the gateway only ever has to
/// map one type onto HTTP status codes.
#[derive(Debug, Error)]
pub enum EduhireError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EduhireError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        EduhireError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Short error code string sent to clients in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EduhireError::NotFound { .. } => "NOT_FOUND",
            EduhireError::Conflict(_) => "CONFLICT",
            EduhireError::InvalidInput(_) => "INVALID_INPUT",
            EduhireError::Unauthorized(_) => "UNAUTHORIZED",
            EduhireError::Forbidden(_) => "FORBIDDEN",
            EduhireError::Config(_) => "CONFIG_ERROR",
            EduhireError::Database(_) => "DATABASE_ERROR",
            EduhireError::Serialization(_) => "SERIALIZATION_ERROR",
            EduhireError::Io(_) => "IO_ERROR",
            EduhireError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, EduhireError>;
