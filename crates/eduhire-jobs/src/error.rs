use eduhire_core::EduhireError;
use eduhire_users::UserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("user {user_id} already applied for job {job_id}")]
    AlreadyApplied { job_id: String, user_id: String },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl From<JobError> for EduhireError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::JobNotFound(id) => EduhireError::not_found("Job", id),
            e @ JobError::AlreadyApplied { .. } => EduhireError::Conflict(e.to_string()),
            JobError::Forbidden(msg) => EduhireError::Forbidden(msg),
            JobError::InvalidInput(msg) => EduhireError::InvalidInput(msg),
            JobError::User(e) => e.into(),
            JobError::Database(e) => EduhireError::Database(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
