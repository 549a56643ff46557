//! Course catalog and the progression engine: quiz grading, teaching-style
//! rotation on failure, attempt tracking, and completion rewards.

pub mod attempts;
pub mod catalog;
pub mod completion;
pub mod db;
pub mod engine;
pub mod error;
pub mod grader;
pub mod modality;
pub mod types;

pub use catalog::CourseCatalog;
pub use engine::LearningEngine;
pub use error::LearningError;
pub use types::{
    Course, CourseCompletion, CourseSummary, Difficulty, QuizOutcome, QuizQuestion, Topic,
    TopicCompletion, Video, VideoStyle,
};
