pub mod board;
pub mod db;
pub mod error;
pub mod matching;
pub mod types;

pub use board::JobBoard;
pub use error::JobError;
pub use matching::{evaluate, MatchEvaluation};
pub use types::{
    Application, ApplicationDraft, ApplicationStatus, ApplicationWithJob, Job, JobDraft, JobType,
    Salary, SkillMatch,
};
