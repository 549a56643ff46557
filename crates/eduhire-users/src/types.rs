use std::collections::BTreeMap;

use eduhire_core::types::UserRole;
use serde::{Deserialize, Serialize};

/// Full user document. Stored as one SQLite row; nested collections are JSON
/// columns so every mutation of the document is a single-row write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// UUIDv7.
    pub id: String,
    pub name: String,
    pub email: String,
    /// argon2id PHC string. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,

    pub skills: Vec<SkillEntry>,
    /// Only ever increased by reward grants.
    pub coins: i64,
    pub completed_courses: Vec<CompletedCourse>,
    pub completed_topics: Vec<CompletedTopic>,
    pub attempts: AttemptLedger,

    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Case-insensitive lookup; skill names are unique per user ignoring case.
    pub fn skill(&self, name: &str) -> Option<&SkillEntry> {
        self.skills.iter().find(|s| s.is_named(name))
    }

    pub fn skill_mut(&mut self, name: &str) -> Option<&mut SkillEntry> {
        self.skills
            .iter_mut()
            .find(|s| s.is_named(name))
    }

    pub fn verified_skills(&self) -> impl Iterator<Item = &SkillEntry> {
        self.skills.iter().filter(|s| s.verified)
    }

    pub fn has_completed_course(&self, course_id: &str) -> bool {
        self.completed_courses.iter().any(|c| c.course_id == course_id)
    }

    /// Matches on the (course, topic) identifiers only; the timestamp is
    /// irrelevant to identity.
    pub fn has_completed_topic(&self, course_id: &str, topic_id: &str) -> bool {
        self.completed_topics
            .iter()
            .any(|t| t.course_id == course_id && t.topic_id == topic_id)
    }
}

/// Fields supplied at registration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub skill: String,
    pub level: u32,
    /// True only once earned through course completion.
    pub verified: bool,
    pub completed_date: Option<String>,
}

impl SkillEntry {
    /// Unicode-aware, case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.skill == name || self.skill.to_lowercase() == name.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedCourse {
    pub course_id: String,
    pub completed_at: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTopic {
    pub course_id: String,
    pub topic_id: String,
    pub completed_at: String,
}

/// Key of the per-topic failure counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptKey {
    pub course_id: String,
    pub topic_id: String,
}

impl AttemptKey {
    pub fn new(course_id: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            topic_id: topic_id.into(),
        }
    }
}

/// Failed-quiz counters keyed by (course, topic). Absent keys read as zero.
///
/// Persisted as a JSON array of `{course_id, topic_id, failures}` records
/// because JSON object keys cannot be composite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AttemptRecord>", into = "Vec<AttemptRecord>")]
pub struct AttemptLedger(BTreeMap<AttemptKey, u32>);

impl AttemptLedger {
    pub fn count(&self, key: &AttemptKey) -> u32 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Bump the counter for `key`, creating it at 1 if absent. Returns the
    /// new count.
    pub fn increment(&mut self, key: AttemptKey) -> u32 {
        let count = self.0.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttemptKey, u32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttemptRecord {
    course_id: String,
    topic_id: String,
    failures: u32,
}

impl From<Vec<AttemptRecord>> for AttemptLedger {
    fn from(records: Vec<AttemptRecord>) -> Self {
        let mut ledger = BTreeMap::new();
        for r in records {
            // Duplicate records (hand-edited rows) are summed rather than lost.
            *ledger
                .entry(AttemptKey::new(r.course_id, r.topic_id))
                .or_insert(0) += r.failures;
        }
        Self(ledger)
    }
}

impl From<AttemptLedger> for Vec<AttemptRecord> {
    fn from(ledger: AttemptLedger) -> Self {
        ledger
            .0
            .into_iter()
            .map(|(k, failures)| AttemptRecord {
                course_id: k.course_id,
                topic_id: k.topic_id,
                failures,
            })
            .collect()
    }
}

/// Public leaderboard row.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub coins: i64,
    pub skills: Vec<SkillEntry>,
    pub completed_courses: usize,
}
