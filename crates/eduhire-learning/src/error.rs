use eduhire_core::EduhireError;
use eduhire_users::UserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearningError {
    #[error("course not found: {0}")]
    CourseNotFound(String),

    #[error("topic not found: {course_id}/{topic_id}")]
    TopicNotFound { course_id: String, topic_id: String },

    /// A topic with no quiz questions cannot be scored.
    #[error("topic {topic_id} has no quiz questions")]
    EmptyQuiz { topic_id: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("course already completed: {course_id}")]
    AlreadyCompleted { course_id: String },

    #[error(transparent)]
    User(#[from] UserError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl From<LearningError> for EduhireError {
    fn from(err: LearningError) -> Self {
        match err {
            LearningError::CourseNotFound(id) => EduhireError::not_found("Course", id),
            LearningError::TopicNotFound {
                course_id,
                topic_id,
            } => EduhireError::not_found("Topic", format!("{course_id}/{topic_id}")),
            e @ LearningError::EmptyQuiz { .. } => EduhireError::InvalidInput(e.to_string()),
            LearningError::InvalidInput(msg) => EduhireError::InvalidInput(msg),
            e @ LearningError::AlreadyCompleted { .. } => EduhireError::Conflict(e.to_string()),
            LearningError::User(e) => e.into(),
            LearningError::Database(e) => EduhireError::Database(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LearningError>;
