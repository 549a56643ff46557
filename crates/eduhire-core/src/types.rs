use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fresh record id. UUIDv7 so ids sort by creation time in logs and tables.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current wall-clock time as an RFC 3339 string, the timestamp format used
/// in every table.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Account role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Employer,
}

impl UserRole {
    pub fn is_employer(&self) -> bool {
        matches!(self, UserRole::Employer)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Employer => write!(f, "employer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "employer" => Ok(UserRole::Employer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
