use eduhire_core::EduhireError;
use thiserror::Error;

/// All user-ledger errors. Converted into `EduhireError` at the crate boundary
/// so callers can tell a missing user from a duplicate email.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

impl From<UserError> for EduhireError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => EduhireError::not_found("User", id),
            UserError::AlreadyExists(email) => {
                EduhireError::Conflict(format!("email already registered: {email}"))
            }
            UserError::InvalidInput(msg) => EduhireError::InvalidInput(msg),
            UserError::PasswordHash(msg) => EduhireError::Internal(msg),
            UserError::DatabaseError(e) => EduhireError::Database(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, UserError>;
