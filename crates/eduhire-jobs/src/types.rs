use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "full-time"),
            JobType::PartTime => write!(f, "part-time"),
            JobType::Internship => write!(f, "internship"),
            JobType::Contract => write!(f, "contract"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "internship" => Ok(JobType::Internship),
            "contract" => Ok(JobType::Contract),
            other => Err(format!("unknown job type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A job posting. Read-only to the application flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    /// Skill names an applicant is matched against, case-insensitively.
    pub skills_required: Vec<String>,
    pub location: Option<String>,
    pub job_type: JobType,
    pub salary: Option<Salary>,
    pub application_deadline: Option<String>,
    pub is_active: bool,
    /// Employer user id.
    pub posted_by: String,
    /// When false every application counts as verified regardless of skills.
    pub requires_verification: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields an employer supplies when posting.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    pub salary: Option<Salary>,
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub requires_verification: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Reviewed => write!(f, "reviewed"),
            ApplicationStatus::Accepted => write!(f, "accepted"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// One entry of the match vector: did the applicant hold `skill` verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    /// Frozen at apply time; later skill changes do not rewrite it.
    pub skills_match: Vec<SkillMatch>,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Optional fields an applicant supplies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationDraft {
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

/// An application with its job, for the applicant's own listing.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    /// None if the job row has since been removed.
    pub job: Option<Job>,
}
